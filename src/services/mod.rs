pub mod openai_client;
pub mod repair;
mod tool_call_utils;
pub mod transport;
