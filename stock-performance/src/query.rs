use crate::error::PerformanceError;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Bundled analytical queries over the sample `security_reference` & `daily_returns` tables.
pub const QUERIES_SQL: &str = include_str!("../sql/queries.sql");

const NAME_MARKER: &str = "-- name:";
const QUESTION_MARKER: &str = "-- question:";
const ASSUMPTIONS_MARKER: &str = "-- assumptions:";

/// A named SQL query answering one analytical question.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct SqlQuery<'a> {
    pub name: &'a str,
    pub question: &'a str,
    pub assumptions: &'a str,
    pub sql: &'a str,
}

impl Display for SqlQuery<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{NAME_MARKER} {}", self.name)?;
        writeln!(f, "{QUESTION_MARKER} {}", self.question)?;
        writeln!(f, "{ASSUMPTIONS_MARKER} {}", self.assumptions)?;
        write!(f, "{}", self.sql)
    }
}

/// Every bundled [`SqlQuery`], in file order.
pub fn queries() -> Result<Vec<SqlQuery<'static>>, PerformanceError> {
    parse_queries(QUERIES_SQL)
}

/// Find a bundled [`SqlQuery`] by name.
pub fn query(name: &str) -> Result<SqlQuery<'static>, PerformanceError> {
    queries()?
        .into_iter()
        .find(|query| query.name == name)
        .ok_or_else(|| PerformanceError::Query(format!("no query named {name}")))
}

/// Parse queries delimited by `-- name:`, `-- question:` & `-- assumptions:` marker lines.
///
/// Anything before the first `-- name:` marker is treated as a file header & ignored.
pub fn parse_queries(source: &str) -> Result<Vec<SqlQuery<'_>>, PerformanceError> {
    let starts = source
        .match_indices(NAME_MARKER)
        .map(|(index, _)| index)
        .filter(|&index| index == 0 || source[..index].ends_with('\n'))
        .collect::<Vec<_>>();

    let ends = starts.iter().skip(1).copied().chain(Some(source.len()));

    let queries = starts
        .iter()
        .zip(ends)
        .map(|(&start, end)| parse_query(&source[start..end]))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some((index, duplicate)) = queries
        .iter()
        .enumerate()
        .find(|(index, query)| queries[..*index].iter().any(|prior| prior.name == query.name))
    {
        return Err(PerformanceError::Query(format!(
            "query #{index} reuses the name {}",
            duplicate.name
        )));
    }

    Ok(queries)
}

fn parse_query(block: &str) -> Result<SqlQuery<'_>, PerformanceError> {
    let (name, rest) = marker_line(block, NAME_MARKER)?;
    let (question, rest) = marker_line(rest, QUESTION_MARKER)?;
    let (assumptions, rest) = marker_line(rest, ASSUMPTIONS_MARKER)?;

    let sql = rest.trim();
    if sql.is_empty() {
        return Err(PerformanceError::Query(format!("query {name} has no SQL")));
    }

    Ok(SqlQuery {
        name,
        question,
        assumptions,
        sql,
    })
}

fn marker_line<'a>(block: &'a str, marker: &str) -> Result<(&'a str, &'a str), PerformanceError> {
    let (line, rest) = block.split_once('\n').unwrap_or((block, ""));

    line.trim()
        .strip_prefix(marker)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| (value, rest))
        .ok_or_else(|| {
            PerformanceError::Query(format!("expected `{marker}` line, found `{}`", line.trim()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_queries_parse() {
        let actual = queries().unwrap();

        assert_eq!(
            actual.iter().map(|query| query.name).collect::<Vec<_>>(),
            vec![
                "securities_per_sector",
                "best_single_day_returns",
                "average_return_by_region",
                "securities_without_returns",
                "compound_monthly_returns",
                "most_volatile_securities",
            ]
        );

        for query in actual {
            assert!(query.sql.starts_with("SELECT"), "{} failed", query.name);
            assert!(query.sql.ends_with(';'), "{} failed", query.name);
            assert!(!query.sql.contains(NAME_MARKER), "{} failed", query.name);
        }
    }

    #[test]
    fn test_query_by_name() {
        let actual = query("most_volatile_securities").unwrap();
        assert!(actual.sql.contains("STDDEV_SAMP"));
        assert!(actual.question.starts_with("Which five securities"));

        assert!(matches!(query("unknown"), Err(PerformanceError::Query(_))));
    }

    #[test]
    fn test_parse_queries() {
        struct TestCase {
            input: &'static str,
            expected: Result<usize, ()>,
        }

        let cases = vec![
            // TC0: header is ignored, two queries
            TestCase {
                input: "-- header\n\n-- name: a\n-- question: q\n-- assumptions: none\nSELECT 1;\n\n-- name: b\n-- question: q\n-- assumptions: none\nSELECT 2;\n",
                expected: Ok(2),
            },
            // TC1: no queries at all
            TestCase {
                input: "-- just a comment\n",
                expected: Ok(0),
            },
            // TC2: missing question line
            TestCase {
                input: "-- name: a\n-- assumptions: none\nSELECT 1;\n",
                expected: Err(()),
            },
            // TC3: missing SQL body
            TestCase {
                input: "-- name: a\n-- question: q\n-- assumptions: none\n\n",
                expected: Err(()),
            },
            // TC4: duplicate names
            TestCase {
                input: "-- name: a\n-- question: q\n-- assumptions: none\nSELECT 1;\n-- name: a\n-- question: q\n-- assumptions: none\nSELECT 2;\n",
                expected: Err(()),
            },
            // TC5: CRLF line endings
            TestCase {
                input: "-- name: a\r\n-- question: q\r\n-- assumptions: none\r\nSELECT 1;\r\n",
                expected: Ok(1),
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            let actual = parse_queries(test.input).map(|queries| queries.len());
            match test.expected {
                Ok(expected) => assert_eq!(actual, Ok(expected), "TC{index} failed"),
                Err(()) => assert!(
                    matches!(actual, Err(PerformanceError::Query(_))),
                    "TC{index} failed"
                ),
            }
        }
    }

    #[test]
    fn test_sql_query_display_round_trips() {
        let source = "-- name: a\n-- question: What?\n-- assumptions: none\nSELECT 1;";
        let parsed = parse_queries(source).unwrap();
        assert_eq!(parsed[0].to_string(), source);
    }
}
