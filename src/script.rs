//! SQL script parsing and execution
//!
//! Schema scripts use a line-oriented dialect: lines starting with `--` are
//! comments, and a statement ends at a line whose last character is `;`. This
//! pairs with [`StorageEngine::schema_file`](crate::StorageEngine::schema_file)
//! to bootstrap a freshly built data source from a per-engine script.

use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::datasource::StorageDataSource;
use crate::error::Result;

/// Parse the statements contained in a SQL script.
///
/// Comment lines are skipped, statements may span multiple lines, and the
/// terminating `;` is stripped. A trailing fragment with no terminating `;`
/// is ignored.
pub fn parse_statements<R: Read>(input: R) -> io::Result<Vec<String>> {
   let reader = BufReader::new(input);
   let mut statements = Vec::new();
   let mut current = String::new();

   for line in reader.lines() {
      let line = line?;
      let line = line.trim();
      if line.starts_with("--") {
         continue;
      }
      if let Some(body) = line.strip_suffix(';') {
         current.push_str(body);
         let statement = current.trim().to_string();
         if !statement.is_empty() {
            statements.push(statement);
         }
         current.clear();
      } else if !line.is_empty() {
         current.push_str(line);
         current.push(' ');
      }
   }

   Ok(statements)
}

/// Run every statement in `sql` against the data source, in order.
///
/// Execution stops at the first failing statement; statements already run are
/// not rolled back.
pub async fn run(source: &StorageDataSource, sql: &str) -> Result<()> {
   let statements = parse_statements(sql.as_bytes())?;
   debug!(
      pool = %source.name(),
      statements = statements.len(),
      "running script"
   );
   for statement in &statements {
      source.execute(statement).await?;
   }
   Ok(())
}

/// Read a script file and run it against the data source
pub async fn run_file(source: &StorageDataSource, path: impl AsRef<Path>) -> Result<()> {
   let sql = tokio::fs::read_to_string(path.as_ref()).await?;
   run(source, &sql).await
}
