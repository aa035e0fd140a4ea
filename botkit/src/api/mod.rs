pub mod html;
pub mod keyboard;
