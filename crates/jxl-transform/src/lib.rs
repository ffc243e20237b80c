//! Pixel-domain transforms shared by the Modular and VarDCT pipelines.

pub mod adaptive_quant;
pub mod cfl;
pub mod dc_predict;
pub mod dct;
pub mod groups;
pub mod med;
pub mod modular;
pub mod prediction;
pub mod quantization;
pub mod squeeze;
pub mod zigzag;

pub use adaptive_quant::*;
pub use cfl::*;
pub use dc_predict::*;
pub use dct::*;
pub use groups::*;
pub use med::*;
pub use modular::*;
pub use quantization::*;
pub use squeeze::*;
pub use zigzag::*;
