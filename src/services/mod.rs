pub mod payment_pipeline;
pub mod validator;
