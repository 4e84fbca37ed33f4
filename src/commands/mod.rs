pub mod contextmenu;
pub mod help;
pub mod userid;
