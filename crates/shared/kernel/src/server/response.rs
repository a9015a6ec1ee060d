use autoims_derive::api_model;

#[api_model(response)]
/// Acknowledgement without a payload
pub struct MessageBody {
    pub message: &'static str,
}

impl MessageBody {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}
