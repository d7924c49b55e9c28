//! 슬라이딩 윈도우 VWAP 계산 엔진

pub mod computer;
pub mod window;

pub use computer::VwapComputer;
pub use window::{SymbolWindow, WindowEntry};
