//! Client core for the IISC complaint and support intake service.
//!
//! The request form is checked by [`validation`], kept as an immutable
//! [`form::FormState`], and sent by [`submission::RequestSubmitter`] as a
//! multipart request to one of the intake endpoints in [`api`].

pub mod api;
pub mod attachments;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod dto;
pub mod errors;
pub mod form;
pub mod logging;
pub mod session;
pub mod storage;
pub mod submission;
pub mod validation;
