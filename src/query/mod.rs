//! Snapshot query grammar.
//!
//! A snapshot query is a single `SELECT` whose table references are written
//! as `dataset.table` and whose column references are written as
//! `dataset.table.column`. Parsing uses sqlparser's `GenericDialect`; this
//! module only extracts the names a query refers to; it never translates or
//! runs the query.

use std::ops::ControlFlow;

use sqlparser::ast::{visit_expressions, visit_relations, Expr, Ident, Statement};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use thiserror::Error;

/// Errors raised while parsing a snapshot query.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryError {
    #[error("Invalid query syntax: {0}")]
    Syntax(String),

    #[error("Reference '{0}' is not fully qualified")]
    NotFullyQualified(String),

    #[error("Query does not reference any dataset")]
    NoDatasets,
}

pub type QueryResult<T> = Result<T, QueryError>;

/// A parsed snapshot query and the names it references.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    dataset_names: Vec<String>,
    table_names: Vec<String>,
    column_names: Vec<String>,
}

impl Query {
    /// Parse a snapshot query.
    ///
    /// # Example
    ///
    /// ```
    /// use datarepo::query::Query;
    ///
    /// let query = Query::parse("SELECT foo.bar.x FROM foo.bar").unwrap();
    /// assert_eq!(query.dataset_names(), ["foo"]);
    /// ```
    pub fn parse(sql: &str) -> QueryResult<Self> {
        let dialect = GenericDialect {};
        let statements =
            Parser::parse_sql(&dialect, sql).map_err(|e| QueryError::Syntax(e.to_string()))?;

        let statement = match statements.as_slice() {
            [statement @ Statement::Query(_)] => statement,
            [_] => return Err(QueryError::Syntax("expected a SELECT query".to_string())),
            _ => {
                return Err(QueryError::Syntax(
                    "expected exactly one statement".to_string(),
                ))
            }
        };

        let mut query = Query {
            dataset_names: Vec::new(),
            table_names: Vec::new(),
            column_names: Vec::new(),
        };

        let relations = visit_relations(statement, |name| match name.0.as_slice() {
            [dataset, table] => {
                push_distinct(&mut query.dataset_names, dataset);
                push_distinct(&mut query.table_names, table);
                ControlFlow::Continue(())
            }
            _ => ControlFlow::Break(QueryError::NotFullyQualified(name.to_string())),
        });
        if let ControlFlow::Break(err) = relations {
            return Err(err);
        }

        let columns = visit_expressions(statement, |expr| match expr {
            Expr::Identifier(ident) => {
                ControlFlow::Break(QueryError::NotFullyQualified(ident.value.clone()))
            }
            Expr::CompoundIdentifier(parts) => match parts.as_slice() {
                [_, _, column] => {
                    push_distinct(&mut query.column_names, column);
                    ControlFlow::Continue(())
                }
                _ => ControlFlow::Break(QueryError::NotFullyQualified(join_idents(parts))),
            },
            _ => ControlFlow::Continue(()),
        });
        if let ControlFlow::Break(err) = columns {
            return Err(err);
        }

        Ok(query)
    }

    /// Datasets referenced in `FROM`/`JOIN` clauses, in first-seen order.
    pub fn dataset_names(&self) -> &[String] {
        &self.dataset_names
    }

    /// Tables referenced in `FROM`/`JOIN` clauses, in first-seen order.
    pub fn table_names(&self) -> &[String] {
        &self.table_names
    }

    /// Columns referenced anywhere in the query, in first-seen order.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// The dataset a single-dataset snapshot is taken from.
    pub fn primary_dataset(&self) -> QueryResult<&str> {
        self.dataset_names
            .first()
            .map(String::as_str)
            .ok_or(QueryError::NoDatasets)
    }
}

fn push_distinct(names: &mut Vec<String>, ident: &Ident) {
    if !names.iter().any(|n| n == &ident.value) {
        names.push(ident.value.clone());
    }
}

fn join_idents(parts: &[Ident]) -> String {
    parts
        .iter()
        .map(|p| p.value.as_str())
        .collect::<Vec<_>>()
        .join(".")
}
