// Application layer - State, escalation, dispatch, broadcast and simulation
pub mod broadcast_hub;
pub mod defense_service;
pub mod dispatcher;
pub mod error;
pub mod escalation;
pub mod responder_gateway;
pub mod rover_store;
pub mod simulation;
