mod client;
mod request;

pub use client::Client;
pub use request::{field_errors, ClientPatchReq, NewClientReq};
