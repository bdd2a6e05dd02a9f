//! # Normalização de Linhas VRA
//!
//! Converte uma linha bruta em `FlightRecord`. Os nomes de coluna podem chegar
//! corrompidos (UTF-8 lido como Latin-1), então cada campo aceita mais de uma grafia.
//! A resolução nome → índice acontece uma vez, no cabeçalho.

use chrono::NaiveDateTime;

use crate::temporal::parse_br_datetime;

/// Campos lógicos lidos de cada linha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Airline,
    Origin,
    Destination,
    ScheduledDeparture,
    ActualDeparture,
    ScheduledArrival,
    ActualArrival,
    Status,
}

/// Grafias aceitas por campo: a correta e a variante corrompida conhecida.
const FIELD_SPELLINGS: [(Field, &[&str]); 8] = [
    (Field::Airline, &["ICAO Empresa Aérea", "ICAO Empresa AÃ©rea"]),
    (Field::Origin, &["ICAO Aeródromo Origem", "ICAO AerÃ³dromo Origem"]),
    (Field::Destination, &["ICAO Aeródromo Destino", "ICAO AerÃ³dromo Destino"]),
    (Field::ScheduledDeparture, &["Partida Prevista"]),
    (Field::ActualDeparture, &["Partida Real"]),
    (Field::ScheduledArrival, &["Chegada Prevista"]),
    (Field::ActualArrival, &["Chegada Real"]),
    (Field::Status, &["Situação Voo", "SituaÃ§Ã£o Voo"]),
];

/// BOM UTF-8 decodificado como Latin-1.
const MANGLED_BOM: &str = "ï»¿";

/// Mapa campo → colunas candidatas, montado a partir do cabeçalho.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    columns: Vec<(Field, Vec<usize>)>,
}

impl HeaderMap {
    pub fn from_header<S: AsRef<str>>(header: &[S]) -> Self {
        let nomes: Vec<String> = header
            .iter()
            .map(|h| h.as_ref().replace(MANGLED_BOM, "").trim().to_string())
            .collect();

        let columns = FIELD_SPELLINGS
            .iter()
            .map(|(field, grafias)| {
                let indices = grafias
                    .iter()
                    .filter_map(|g| nomes.iter().position(|n| n.as_str() == *g))
                    .collect();
                (*field, indices)
            })
            .collect();

        HeaderMap { columns }
    }

    /// Quantos campos lógicos foram encontrados no cabeçalho.
    pub fn resolved_fields(&self) -> usize {
        self.columns.iter().filter(|(_, idx)| !idx.is_empty()).count()
    }

    /// Primeiro valor não vazio entre as colunas do campo. Colunas ausentes na
    /// linha (linha curta) contam como vazias.
    pub fn get<'a, S: AsRef<str>>(&self, row: &'a [S], field: Field) -> &'a str {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .into_iter()
            .flat_map(|(_, indices)| indices.iter())
            .filter_map(|&i| row.get(i))
            .map(|v| v.as_ref().trim())
            .find(|v| !v.is_empty())
            .unwrap_or("")
    }
}

/// Um trecho de voo já tipado.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightRecord {
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: Option<NaiveDateTime>,
    pub actual_departure: Option<NaiveDateTime>,
    pub scheduled_arrival: Option<NaiveDateTime>,
    pub actual_arrival: Option<NaiveDateTime>,
    pub status: String,
}

impl FlightRecord {
    /// Instante que define ano, hora e dia da semana para o período.
    pub fn scheduled_instant(&self) -> Option<NaiveDateTime> {
        self.scheduled_departure.or(self.scheduled_arrival)
    }

    /// Primeiro instante resolvido, na ordem prevista → real.
    pub fn reference_instant(&self) -> Option<NaiveDateTime> {
        self.scheduled_departure
            .or(self.scheduled_arrival)
            .or(self.actual_departure)
            .or(self.actual_arrival)
    }
}

/// Normaliza uma linha. Retorna `None` quando nenhuma coluna mapeada tem conteúdo.
pub fn normalize_row<S: AsRef<str>>(header: &HeaderMap, row: &[S]) -> Option<FlightRecord> {
    let valor = |field| header.get(row, field);

    let campos = FIELD_SPELLINGS.map(|(field, _)| valor(field));
    if campos.iter().all(|v| v.is_empty()) {
        return None;
    }

    Some(FlightRecord {
        airline: valor(Field::Airline).to_string(),
        origin: valor(Field::Origin).to_string(),
        destination: valor(Field::Destination).to_string(),
        scheduled_departure: parse_br_datetime(valor(Field::ScheduledDeparture)),
        actual_departure: parse_br_datetime(valor(Field::ActualDeparture)),
        scheduled_arrival: parse_br_datetime(valor(Field::ScheduledArrival)),
        actual_arrival: parse_br_datetime(valor(Field::ActualArrival)),
        status: valor(Field::Status).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: [&str; 8] = [
        "ICAO Empresa Aérea",
        "ICAO Aeródromo Origem",
        "ICAO Aeródromo Destino",
        "Partida Prevista",
        "Partida Real",
        "Chegada Prevista",
        "Chegada Real",
        "Situação Voo",
    ];

    #[test]
    fn resolves_correct_spelling() {
        let header = HeaderMap::from_header(&HEADER);
        assert_eq!(header.resolved_fields(), 8);

        let row = ["AZU", "SBGR", "SBRJ", "05/03/2020 08:00", "", "", "", "REALIZADO"];
        let rec = normalize_row(&header, &row).unwrap();

        assert_eq!(rec.airline, "AZU");
        assert_eq!(rec.origin, "SBGR");
        assert_eq!(rec.destination, "SBRJ");
        assert!(rec.scheduled_departure.is_some());
        assert_eq!(rec.actual_departure, None);
        assert_eq!(rec.status, "REALIZADO");
    }

    #[test]
    fn resolves_mangled_spelling_and_bom() {
        let header = HeaderMap::from_header(&[
            "ï»¿ICAO Empresa AÃ©rea",
            " ICAO AerÃ³dromo Origem ",
            "SituaÃ§Ã£o Voo",
        ]);
        assert_eq!(header.resolved_fields(), 3);

        let rec = normalize_row(&header, &["GLO", "SBSP", "ATRASADO"]).unwrap();
        assert_eq!(rec.airline, "GLO");
        assert_eq!(rec.origin, "SBSP");
        assert_eq!(rec.status, "ATRASADO");
    }

    #[test]
    fn ragged_rows_do_not_abort() {
        let header = HeaderMap::from_header(&HEADER);

        let curta = normalize_row(&header, &["AZU", " SBGR "]).unwrap();
        assert_eq!(curta.origin, "SBGR");
        assert_eq!(curta.status, "");
        assert_eq!(curta.reference_instant(), None);

        let longa = ["AZU", "SBGR", "SBRJ", "", "", "", "", "", "extra", "extra"];
        assert!(normalize_row(&header, &longa).is_some());
    }

    #[test]
    fn blank_row_is_skipped() {
        let header = HeaderMap::from_header(&HEADER);
        assert_eq!(normalize_row(&header, &[""]), None);
        assert_eq!(normalize_row::<&str>(&header, &[]), None);
    }

    #[test]
    fn reference_instant_prefers_scheduled() {
        let header = HeaderMap::from_header(&HEADER);
        let row = ["", "", "", "", "01/01/2019 10:00", "02/01/2020 11:00", "", ""];
        let rec = normalize_row(&header, &row).unwrap();

        assert_eq!(rec.scheduled_instant(), rec.scheduled_arrival);
        assert_eq!(rec.reference_instant(), rec.scheduled_arrival);
    }
}
