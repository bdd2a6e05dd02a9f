//! Implementações de traits para os enums de erro do sistema
//!
//! Este módulo existe exclusivamente para desacoplar:
//! - definição de erros (enums)
//! - implementação de traits (`Display`, `Error`, `From`)

use std::error::Error as StdError;
use std::fmt;

use crate::errors::ProcessorError;

/* ========================================================================== */
/* Display                                                                    */
/* ========================================================================== */

impl fmt::Display for ProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessorError::Io(err) => {
                write!(f, "[I/O] {}", err)
            }

            ProcessorError::Json(err) => {
                write!(f, "[JSON] {}", err)
            }

            ProcessorError::Csv(err) => {
                write!(f, "[CSV] {}", err)
            }

            ProcessorError::Schema(msg) => {
                write!(f, "[Schema] {}", msg)
            }

            ProcessorError::File { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
        }
    }
}

/* ========================================================================== */
/* std::error::Error                                                          */
/* ========================================================================== */

impl StdError for ProcessorError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ProcessorError::Io(err) => Some(err),
            ProcessorError::Json(err) => Some(err),
            ProcessorError::Csv(err) => Some(err),
            ProcessorError::Schema(_) => None,
            ProcessorError::File { source, .. } => Some(source.as_ref()),
        }
    }
}

/* ========================================================================== */
/* Conversions                                                                */
/* ========================================================================== */

impl From<std::io::Error> for ProcessorError {
    fn from(err: std::io::Error) -> Self {
        ProcessorError::Io(err)
    }
}

impl From<serde_json::Error> for ProcessorError {
    fn from(err: serde_json::Error) -> Self {
        ProcessorError::Json(err)
    }
}

impl From<csv::Error> for ProcessorError {
    fn from(err: csv::Error) -> Self {
        ProcessorError::Csv(err)
    }
}
