use serde::{Deserialize, Serialize};

/// Серьёзность итога операции
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// Итог операции для клиента
///
/// Каждая изменяющая операция возвращает ровно один итог:
/// зелёный (успех), жёлтый (успех с оговоркой) или красный (отказ).
/// Жёлтый используется, когда запись сохранена, но оператору нужно
/// что-то проверить (например, сменился учётный номер).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub severity: Severity,
    pub message: String,
}

impl OperationOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{}] {}", tag, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_serializes_lowercase() {
        let outcome = OperationOutcome::warning("Учётный номер изменён");
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"severity\":\"warning\""));
    }
}
