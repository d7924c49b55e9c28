/**
* filename : decimal
* author : HAMA
* date: 2025. 6. 2.
* description: 거래 수량/가격 문자열 파싱
**/

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{ParseError, TradeField};

/// 십진 표기 문자열을 f64로 변환
///
/// 표기 검증은 `Decimal`이 담당하고 (지수 표기, `inf`, `NaN`, 소수점 중복 거부),
/// 값 자체는 원문에서 바로 f64로 변환해 올바르게 반올림된 값을 얻습니다.
pub fn parse_decimal(field: TradeField, value: &str) -> Result<f64, ParseError> {
  let invalid = || ParseError::InvalidNotation {
    field,
    value: value.to_string(),
  };

  if let Err(e) = Decimal::from_str(value) {
    // 표기는 올바르지만 96비트 가수부를 넘는 값
    if is_overflow(&e) {
      return Err(ParseError::OutOfRange {
        field,
        value: value.to_string(),
      });
    }
    return Err(invalid());
  }
  let parsed = value.parse::<f64>().map_err(|_| invalid())?;

  if !parsed.is_finite() || parsed < 0.0 {
    return Err(ParseError::OutOfRange {
      field,
      value: value.to_string(),
    });
  }

  Ok(parsed)
}

fn is_overflow(error: &rust_decimal::Error) -> bool {
  match error {
    rust_decimal::Error::ExceedsMaximumPossibleValue
    | rust_decimal::Error::LessThanMinimumPossibleValue
    | rust_decimal::Error::Underflow => true,
    rust_decimal::Error::ErrorString(message) => message.contains("overflow"),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_plain_notation() {
    assert_eq!(parse_decimal(TradeField::Volume, "0.0715337"), Ok(0.0715337));
    assert_eq!(parse_decimal(TradeField::Price, "69897.48"), Ok(69897.48));
    assert_eq!(parse_decimal(TradeField::Volume, "3"), Ok(3.0));
    assert_eq!(parse_decimal(TradeField::Volume, "0"), Ok(0.0));
  }

  #[test]
  fn test_double_decimal_point_rejected() {
    let err = parse_decimal(TradeField::Volume, "0..0715337").unwrap_err();
    assert_eq!(
      err,
      ParseError::InvalidNotation {
        field: TradeField::Volume,
        value: "0..0715337".to_string(),
      }
    );
  }

  #[test]
  fn test_non_numeric_rejected() {
    for bad in ["", "abc", "1.2.3", "NaN", "inf", "1e5", "12 "] {
      let err = parse_decimal(TradeField::Price, bad).unwrap_err();
      assert_eq!(err.field(), TradeField::Price, "input {:?}", bad);
      assert!(matches!(err, ParseError::InvalidNotation { .. }), "input {:?}", bad);
    }
  }

  #[test]
  fn test_beyond_decimal_range_is_out_of_range() {
    let err = parse_decimal(TradeField::Volume, "79228162514264337593543950336").unwrap_err();
    assert_eq!(
      err,
      ParseError::OutOfRange {
        field: TradeField::Volume,
        value: "79228162514264337593543950336".to_string(),
      }
    );

    // Decimal::MAX 자체는 허용
    assert!(parse_decimal(TradeField::Volume, "79228162514264337593543950335").is_ok());
  }

  #[test]
  fn test_negative_rejected() {
    let err = parse_decimal(TradeField::Price, "-3801.13").unwrap_err();
    assert!(matches!(err, ParseError::OutOfRange { .. }));
  }
}
