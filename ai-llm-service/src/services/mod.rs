//! Concrete provider clients.

pub mod gemini_service;
pub mod mock_service;
pub mod open_ai_service;
