pub mod bootstrap;
pub mod path;
pub mod robot;
pub mod session;
pub mod vegetation;
