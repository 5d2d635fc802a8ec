pub mod inputmap;
pub mod orbit;
pub mod session;
