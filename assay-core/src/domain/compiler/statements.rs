// assay-core/src/domain/compiler/statements.rs

use sqlparser::dialect::GenericDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

use crate::domain::error::DomainError;

/// Splits a script into statements on top-level `;`.
///
/// Works on tokens, so semicolons inside string literals or comments do not split.
/// Statement text is kept as written; empty statements are dropped.
pub fn split_statements(sql: &str) -> Result<Vec<String>, DomainError> {
    let dialect = GenericDialect {};
    let tokens = Tokenizer::new(&dialect, sql)
        .with_unescape(false)
        .tokenize()
        .map_err(|e| DomainError::conversion(format!("could not tokenize SQL: {}", e)))?;

    let mut statements = Vec::new();
    let mut current = String::new();
    for token in tokens {
        match token {
            Token::SemiColon => {
                push_statement(&mut statements, &current);
                current.clear();
            }
            other => current.push_str(&other.to_string()),
        }
    }
    push_statement(&mut statements, &current);

    Ok(statements)
}

fn push_statement(statements: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}
