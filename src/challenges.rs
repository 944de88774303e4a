//! Built-in lessons for the learn menu
//!
//! Lessons chain by title: "next" loads the lesson after the one whose
//! name matches the current `@title:` header.

use crate::types::Challenge;

const GETTING_STARTED: &str = r#"
/*
@title: getting started
@author: puzzlelab
*/

// Press F5 to run. Move the player with "s".
const player = "p";

setLegend([ player, bitmap`
................
................
......0000......
......0..0......
......0000......
................`]);

setMap(map`
p.
..`);

onInput("s", () => {
  getFirst(player).y += 1
});
"#;

const PUSHING_BOXES: &str = r#"
/*
@title: pushing boxes
@author: puzzlelab
*/

// Make the box pushable by the player, then run again.
const player = "p";
const box = "b";

setLegend(
  [ player, bitmap`
......00........
......00........`],
  [ box, bitmap`
.00000000000000.
.00000000000000.`]
);

setMap(map`
pb.
...`);

setPushables({
  [ player ]: [],
});

onInput("d", () => {
  getFirst(player).x += 1
});
"#;

const WINNING: &str = r#"
/*
@title: winning
@author: puzzlelab
*/

// Show a message once the box reaches the goal.
const player = "p";
const box = "b";
const goal = "g";

setLegend(
  [ player, bitmap`
......00........`],
  [ box, bitmap`
.00000000000000.`],
  [ goal, bitmap`
.44444444444444.`]
);

setMap(map`
pbg`);

setPushables({
  [ player ]: [ box ],
});

onInput("d", () => {
  getFirst(player).x += 1
});

afterInput(() => {
  if (tilesWith(box, goal).length > 0) addText("you win!");
});
"#;

/// Lessons in order
pub fn builtin() -> Vec<Challenge> {
    vec![
        Challenge::new("getting started", GETTING_STARTED),
        Challenge::new("pushing boxes", PUSHING_BOXES),
        Challenge::new("winning", WINNING),
    ]
}
