pub mod binary;
pub mod padic;
pub mod valuation;
