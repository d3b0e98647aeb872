// Domain layer - Rover, threat and alert models
pub mod alert;
pub mod event;
pub mod responder;
pub mod rover;
pub mod threat;
