/// Terminal front end: keyboard and gamepad capture, drawing, diff rendering.

pub mod draw;
pub mod gamepad;
pub mod input;
pub mod renderer;
