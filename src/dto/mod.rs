//! DTOs de la API HTTP

pub mod booking_dto;

pub use booking_dto::{BookServiceRequest, BookServiceResponse, ScheduledServiceRequest};
