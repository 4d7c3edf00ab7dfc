//! Linear fee estimate

use serde::{Deserialize, Serialize};

use crate::wallet::UnsignedTransaction;

/// Fee per byte, as a fraction `FEE_PER_BYTE_NUM / FEE_PER_BYTE_DEN` (0.44)
const FEE_PER_BYTE_NUM: u64 = 44;
const FEE_PER_BYTE_DEN: u64 = 100;
/// Constant fee component in lovelace
pub const FEE_CONSTANT: u64 = 155_381;

/// Approximate transaction fee
///
/// Only informational; it never gates a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeEstimate {
    /// Fee in lovelace
    pub lovelace: u64,
    /// Transaction size the estimate is based on
    pub tx_size: u64,
    /// Always true, the estimate ignores scripts and witnesses
    pub approximate: bool,
}

impl FeeEstimate {
    /// `ceil(0.44 * size + 155381)`
    pub fn from_tx_size(tx_size: u64) -> Self {
        let size_component = (tx_size * FEE_PER_BYTE_NUM).div_ceil(FEE_PER_BYTE_DEN);
        Self {
            lovelace: size_component + FEE_CONSTANT,
            tx_size,
            approximate: true,
        }
    }

    /// Estimate for an unsigned transaction
    pub fn from_unsigned(tx: &UnsignedTransaction) -> Self {
        Self::from_tx_size(tx.size_bytes() as u64)
    }

    /// Fee in ADA
    pub fn ada(&self) -> f64 {
        self.lovelace as f64 / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_formula() {
        assert_eq!(FeeEstimate::from_tx_size(0).lovelace, 155_381);
        // 0.44 * 300 = 132
        assert_eq!(FeeEstimate::from_tx_size(300).lovelace, 155_513);
        // 0.44 * 1 = 0.44, rounds up
        assert_eq!(FeeEstimate::from_tx_size(1).lovelace, 155_382);
    }

    #[test]
    fn test_fee_from_hex() {
        let tx = UnsignedTransaction("00".repeat(250));
        let fee = FeeEstimate::from_unsigned(&tx);
        assert_eq!(fee.tx_size, 250);
        assert_eq!(fee.lovelace, 155_491);
        assert!(fee.approximate);
        assert!((fee.ada() - 0.155491).abs() < 1e-9);
    }
}
