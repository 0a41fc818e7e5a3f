//! Request types and validation for HTTP endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use serde::{Deserialize, Serialize};

use acciresque_lib::{validate_input, Accident, AccidentDocument};

use crate::{from_lib_error, ProblemDetails};

/// Validation trait for request types.
///
/// Implementations check the request and turn it into the value the
/// handler works with, or return a `ProblemDetails` error for invalid input.
pub trait Validate {
    /// The validated form of the request.
    type Output;

    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(self, request_id: &str) -> Result<Self::Output, Box<ProblemDetails>>;
}

/// Body of `POST /accidents` and `PUT /accidents/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccidentRequest(pub AccidentDocument);

impl Validate for AccidentRequest {
    type Output = Accident;

    fn validate(self, request_id: &str) -> Result<Accident, Box<ProblemDetails>> {
        validate_input(self.0).map_err(|e| Box::new(from_lib_error(&e, request_id)))
    }
}

/// Turn a JSON body rejection into a 400 problem.
///
/// The rejection text only describes the caller's own body.
pub fn json_rejection_problem(rejection: &JsonRejection, request_id: &str) -> ProblemDetails {
    ProblemDetails::bad_request(
        format!("Invalid JSON body: {}", rejection.body_text()),
        request_id,
    )
}

/// Turn a path rejection (e.g. an id that is not valid UTF-8) into a 400 problem.
pub fn path_rejection_problem(rejection: &PathRejection, request_id: &str) -> ProblemDetails {
    ProblemDetails::bad_request(
        format!("Invalid path: {}", rejection.body_text()),
        request_id,
    )
}
