pub mod decimal;
pub mod oco;
pub mod types;
