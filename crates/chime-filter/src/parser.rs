// parser.rs — Recursive-descent parser for the filter language.
//
// Grammar (precedence low → high):
//
//   expr       := and ("||" and)*
//   and        := unary ("&&" unary)*
//   unary      := "!" unary | "(" expr ")" | comparison
//   comparison := operand ("==" operand | "!=" operand | "in" "[" operand ("," operand)* "]")
//   operand    := "build" "." field | string | STATUS_LITERAL
//   field      := "id" | "project_id" | "trigger_id" | "status" | "log_url"
//               | "substitutions" "[" string "]"
//
// Field names and status literals are validated here, so a filter that
// references anything the engine does not expose fails at compile time.

use chime_event::BuildStatus;

use crate::ast::{Expr, Field, Operand};
use crate::error::FilterError;
use crate::lexer::{tokenize, Spanned, Token};

/// Parse filter source text into an expression tree.
pub fn parse(source: &str) -> Result<Expr, FilterError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        eof: source.len(),
    };
    let expr = parser.parse_or()?;
    if let Some(extra) = parser.peek() {
        return Err(FilterError::Syntax {
            pos: extra.pos,
            message: "unexpected trailing input".to_string(),
        });
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    eof: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn here(&self) -> usize {
        self.peek().map(|s| s.pos).unwrap_or(self.eof)
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<(), FilterError> {
        match self.advance() {
            Some(span) if span.token == *expected => Ok(()),
            Some(span) => Err(FilterError::Syntax {
                pos: span.pos,
                message: format!("expected {what}"),
            }),
            None => Err(FilterError::Syntax {
                pos: self.eof,
                message: format!("expected {what}, found end of filter"),
            }),
        }
    }

    fn parse_or(&mut self) -> Result<Expr, FilterError> {
        let mut expr = self.parse_and()?;
        while matches!(self.peek(), Some(s) if s.token == Token::Or) {
            self.advance();
            let rhs = self.parse_and()?;
            expr = Expr::Or(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Expr, FilterError> {
        let mut expr = self.parse_unary()?;
        while matches!(self.peek(), Some(s) if s.token == Token::And) {
            self.advance();
            let rhs = self.parse_unary()?;
            expr = Expr::And(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, FilterError> {
        match self.peek().map(|s| s.token.clone()) {
            Some(Token::Not) => {
                self.advance();
                let inner = self.parse_unary()?;
                Ok(Expr::Not(Box::new(inner)))
            }
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_or()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            _ => self.parse_comparison(),
        }
    }

    fn parse_comparison(&mut self) -> Result<Expr, FilterError> {
        let lhs = self.parse_operand()?;
        match self.advance() {
            Some(Spanned { token: Token::Eq, .. }) => {
                let rhs = self.parse_operand()?;
                Ok(Expr::Eq(lhs, rhs))
            }
            Some(Spanned { token: Token::Ne, .. }) => {
                let rhs = self.parse_operand()?;
                Ok(Expr::Ne(lhs, rhs))
            }
            Some(Spanned { token: Token::Ident(ref name), .. }) if name == "in" => {
                self.expect(&Token::LBracket, "'[' after 'in'")?;
                let mut list = vec![self.parse_operand()?];
                while matches!(self.peek(), Some(s) if s.token == Token::Comma) {
                    self.advance();
                    list.push(self.parse_operand()?);
                }
                self.expect(&Token::RBracket, "']' closing the 'in' list")?;
                Ok(Expr::In(lhs, list))
            }
            Some(span) => Err(FilterError::Syntax {
                pos: span.pos,
                message: "expected '==', '!=' or 'in'".to_string(),
            }),
            None => Err(FilterError::Syntax {
                pos: self.eof,
                message: "expected '==', '!=' or 'in', found end of filter".to_string(),
            }),
        }
    }

    fn parse_operand(&mut self) -> Result<Operand, FilterError> {
        match self.advance() {
            Some(Spanned { token: Token::Str(text), .. }) => Ok(Operand::Literal(text)),
            Some(Spanned { token: Token::Ident(name), .. }) => {
                if name == "build" {
                    self.expect(&Token::Dot, "'.' after 'build'")?;
                    Ok(Operand::Field(self.parse_field()?))
                } else if let Some(status) = BuildStatus::from_name(&name) {
                    // Bare identifiers are status literals, canonicalized to
                    // the status name for string comparison.
                    Ok(Operand::Literal(status.name().to_string()))
                } else {
                    // Identifiers that are neither `build` nor a status are
                    // rejected here rather than evaluating to "never match".
                    Err(FilterError::UnknownStatus { name })
                }
            }
            Some(span) => Err(FilterError::Syntax {
                pos: span.pos,
                message: "expected a field, string or status literal".to_string(),
            }),
            None => Err(FilterError::Syntax {
                pos: self.eof,
                message: "expected a field, string or status literal, found end of filter"
                    .to_string(),
            }),
        }
    }

    fn parse_field(&mut self) -> Result<Field, FilterError> {
        let (name, _pos) = match self.advance() {
            Some(Spanned { token: Token::Ident(name), pos }) => (name, pos),
            Some(span) => {
                return Err(FilterError::Syntax {
                    pos: span.pos,
                    message: "expected a field name after 'build.'".to_string(),
                })
            }
            None => {
                return Err(FilterError::Syntax {
                    pos: self.eof,
                    message: "expected a field name after 'build.', found end of filter"
                        .to_string(),
                })
            }
        };

        match name.as_str() {
            "id" => Ok(Field::Id),
            "project_id" => Ok(Field::ProjectId),
            "trigger_id" => Ok(Field::TriggerId),
            "status" => Ok(Field::Status),
            "log_url" => Ok(Field::LogUrl),
            "substitutions" => {
                self.expect(&Token::LBracket, "'[' after 'build.substitutions'")?;
                let key = match self.advance() {
                    Some(Spanned { token: Token::Str(key), .. }) => key,
                    Some(span) => {
                        return Err(FilterError::Syntax {
                            pos: span.pos,
                            message: "substitution key must be a quoted string".to_string(),
                        })
                    }
                    None => {
                        return Err(FilterError::Syntax {
                            pos: self.eof,
                            message: "substitution key must be a quoted string".to_string(),
                        })
                    }
                };
                self.expect(&Token::RBracket, "']' after the substitution key")?;
                Ok(Field::Substitution(key))
            }
            _ => Err(FilterError::UnknownField { name }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Field, Operand};

    #[test]
    fn parses_status_comparison() {
        let expr = parse("build.status == SUCCESS").unwrap();
        assert_eq!(
            expr,
            Expr::Eq(
                Operand::Field(Field::Status),
                Operand::Literal("SUCCESS".to_string())
            )
        );
    }

    #[test]
    fn parses_substitution_lookup() {
        let expr = parse(r#"build.substitutions["BRANCH_NAME"] != "dev""#).unwrap();
        assert_eq!(
            expr,
            Expr::Ne(
                Operand::Field(Field::Substitution("BRANCH_NAME".to_string())),
                Operand::Literal("dev".to_string())
            )
        );
    }

    #[test]
    fn parses_in_list() {
        let expr = parse("build.status in [FAILURE, TIMEOUT, INTERNAL_ERROR]").unwrap();
        match expr {
            Expr::In(Operand::Field(Field::Status), list) => assert_eq!(list.len(), 3),
            other => panic!("expected In, got {:?}", other),
        }
    }

    #[test]
    fn and_binds_tighter_than_or() {
        // a || b && c parses as a || (b && c)
        let expr = parse(
            r#"build.id == "a" || build.id == "b" && build.id == "c""#,
        )
        .unwrap();
        assert!(matches!(expr, Expr::Or(_, _)));
    }

    #[test]
    fn parses_negation_and_grouping() {
        let expr = parse("!(build.status == WORKING || build.status == QUEUED)").unwrap();
        assert!(matches!(expr, Expr::Not(_)));
    }

    #[test]
    fn rejects_unknown_field_at_compile_time() {
        match parse("build.branch == \"main\"") {
            Err(FilterError::UnknownField { name }) => assert_eq!(name, "branch"),
            other => panic!("expected UnknownField, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_status_literal() {
        match parse("build.status == SUCCEEDED") {
            Err(FilterError::UnknownStatus { name }) => assert_eq!(name, "SUCCEEDED"),
            other => panic!("expected UnknownStatus, got {:?}", other),
        }
    }

    #[test]
    fn rejects_bare_operand_without_comparison() {
        let err = parse("build.status").unwrap_err();
        assert!(matches!(err, FilterError::Syntax { .. }));
    }

    #[test]
    fn rejects_trailing_input() {
        let err = parse("build.status == SUCCESS build.id").unwrap_err();
        assert!(matches!(err, FilterError::Syntax { .. }));
    }

    #[test]
    fn rejects_unquoted_substitution_key() {
        let err = parse("build.substitutions[BRANCH_NAME] == \"main\"").unwrap_err();
        assert!(matches!(err, FilterError::Syntax { .. }));
    }

    #[test]
    fn rejects_empty_source() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, FilterError::Syntax { .. }));
    }
}
