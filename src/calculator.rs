use anyhow::Result;

use crate::errors::AssistantError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn apply(self, a: f64, b: f64) -> Result<f64> {
        match self {
            Operation::Add => Ok(a + b),
            Operation::Subtract => Ok(a - b),
            Operation::Multiply => Ok(a * b),
            Operation::Divide if b == 0.0 => Err(AssistantError::DivisionByZero)?,
            Operation::Divide => Ok(a / b),
        }
    }
}

pub fn parse_operand(input: &str) -> Result<f64> {
    let value = input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| AssistantError::InvalidInput(format!("Некорректное число: {input}")))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations() -> Result<()> {
        assert_eq!(Operation::Add.apply(2.0, 3.5)?, 5.5);
        assert_eq!(Operation::Subtract.apply(2.0, 3.5)?, -1.5);
        assert_eq!(Operation::Multiply.apply(2.0, 3.5)?, 7.0);
        assert_eq!(Operation::Divide.apply(7.0, 2.0)?, 3.5);
        Ok(())
    }

    #[test]
    fn test_division_by_zero() {
        let err = Operation::Divide.apply(1.0, 0.0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssistantError>(),
            Some(AssistantError::DivisionByZero)
        ));
    }

    #[test]
    fn test_parse_operand() -> Result<()> {
        assert_eq!(parse_operand(" 2,5 ")?, 2.5);
        assert!(parse_operand("два").is_err());
        Ok(())
    }
}
