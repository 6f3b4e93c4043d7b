// Security module for argument validation
//
// This module provides utilities to ensure that user-supplied values are
// well-formed before they are interpolated into upstream API requests.

pub mod address_validator;

pub use address_validator::{AddressError, is_address, validate_address};
