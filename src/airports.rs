//! Tabela auxiliar de aeródromos (`airport-codes.csv`).
//!
//! Só enriquece o ranking final; nunca altera contagens.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::errors::ProcessorError;

// Posições fixas das colunas usadas.
const COL_NAME: usize = 2;
const COL_COUNTRY: usize = 6;
const COL_MUNICIPALITY: usize = 8;
const COL_CODE: usize = 9;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirportInfo {
    pub name: String,
    pub municipality: String,
}

/// Código ICAO → nome e município, filtrado por país.
#[derive(Debug, Clone, Default)]
pub struct AirportMeta {
    airports: HashMap<String, AirportInfo>,
}

fn clean(field: &str) -> String {
    field.replace('"', "").trim().to_string()
}

impl AirportMeta {
    /// Carrega a tabela uma vez. Arquivo ausente resulta em tabela vazia.
    pub fn load(path: &Path, country: &str) -> Result<Self, ProcessorError> {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "Tabela de aeródromos ausente; ranking sem nomes");
                return Ok(AirportMeta::default());
            }
            Err(e) => return Err(ProcessorError::Io(e).in_file(path)),
        };

        let meta = Self::parse(&String::from_utf8_lossy(&bytes), country);
        info!(path = %path.display(), aeroportos = meta.len(), "Tabela de aeródromos carregada");
        Ok(meta)
    }

    /// Lê o conteúdo já em memória. A primeira linha é cabeçalho.
    pub fn parse(content: &str, country: &str) -> Self {
        let mut airports = HashMap::new();

        for line in content.lines().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let partes: Vec<&str> = line.split(',').collect();
            let campo = |i: usize| partes.get(i).map(|v| clean(v)).unwrap_or_default();

            let code = campo(COL_CODE);
            if code.is_empty() || campo(COL_COUNTRY) != country {
                continue;
            }
            airports.insert(
                code,
                AirportInfo {
                    name: campo(COL_NAME),
                    municipality: campo(COL_MUNICIPALITY),
                },
            );
        }

        AirportMeta { airports }
    }

    pub fn get(&self, code: &str) -> Option<&AirportInfo> {
        self.airports.get(code)
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABELA: &str = "\
id,ident,name,type,continent,region,iso_country,x,municipality,icao
1,a,Guarulhos Intl,large,SA,SP,BR,_,Guarulhos,\"SBGR\"
2,b,Congonhas,medium,SA,SP,\"BR\",_,São Paulo,SBSP
3,c,Heathrow,large,EU,ENG,GB,_,London,EGLL
4,d,Sem codigo,small,SA,SP,BR,_,Lugar,
5,e,Curta,small
";

    #[test]
    fn keeps_only_target_country() {
        let meta = AirportMeta::parse(TABELA, "BR");

        assert_eq!(meta.len(), 2);
        assert_eq!(
            meta.get("SBGR"),
            Some(&AirportInfo {
                name: "Guarulhos Intl".to_string(),
                municipality: "Guarulhos".to_string(),
            })
        );
        assert_eq!(meta.get("SBSP").unwrap().municipality, "São Paulo");
        assert!(meta.get("EGLL").is_none());
    }

    #[test]
    fn missing_file_yields_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let meta = AirportMeta::load(&dir.path().join("airport-codes.csv"), "BR").unwrap();
        assert!(meta.is_empty());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("airport-codes.csv");
        fs::write(&path, TABELA).unwrap();

        let meta = AirportMeta::load(&path, "GB").unwrap();
        assert_eq!(meta.get("EGLL").unwrap().name, "Heathrow");
    }
}
