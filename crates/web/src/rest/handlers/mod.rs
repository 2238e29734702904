//! REST-Handler Module

pub mod benutzer;
pub mod seiten;
