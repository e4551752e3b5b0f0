//! Form fields and the template tokens built from them.
use crate::common::Result;
use crate::ooxml::docx::Placeholders;
use chrono::NaiveDate;

/// What the user typed into the order form.
///
/// Values are kept as entered; [`OrderFields::normalized`] applies the
/// storage rules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderFields {
    pub vehicle: String,
    pub plate: String,
    pub odometer_in: String,
    pub odometer_out: String,
    /// Multi-line
    pub items_to_check: String,
    /// Multi-line
    pub notes: String,
    /// `S`/`N` flag
    pub step: String,
    /// `S`/`N` flag
    pub wheel_key: String,
    /// `S`/`N` flag
    pub jack: String,
    /// `S`/`N` flag
    pub triangle: String,
}

impl OrderFields {
    /// Free-text fields trimmed, flags uppercased (flags are not trimmed).
    pub fn normalized(&self) -> Self {
        Self {
            vehicle: self.vehicle.trim().to_string(),
            plate: self.plate.trim().to_string(),
            odometer_in: self.odometer_in.trim().to_string(),
            odometer_out: self.odometer_out.trim().to_string(),
            items_to_check: self.items_to_check.trim().to_string(),
            notes: self.notes.trim().to_string(),
            step: self.step.to_uppercase(),
            wheel_key: self.wheel_key.to_uppercase(),
            jack: self.jack.to_uppercase(),
            triangle: self.triangle.to_uppercase(),
        }
    }
}

/// Names of the template tokens, in the order they are filled.
pub const TOKENS: [&str; 14] = [
    "NUM_OS",
    "DATA_ATUAL",
    "DATA_SOLICITACAO",
    "DATA_DEVOLUCAO",
    "VEICULO",
    "PLACA",
    "KM_ENTRADA",
    "KM_SAIDA",
    "ITENS_VERIFICAR",
    "OBSERVACOES",
    "STEP",
    "CHAVE_RODA",
    "MACACO",
    "TRIANGULO",
];

/// Values for every template token of one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<(&'static str, String)>,
}

impl PlaceholderMap {
    /// Build the mapping for an order.
    ///
    /// `fields` are expected to be [normalized](OrderFields::normalized)
    /// already. Both date tokens get `date`; the return date stays empty.
    pub fn new(formatted_number: &str, date: &str, fields: &OrderFields) -> Self {
        let values: [&str; 14] = [
            formatted_number,
            date,
            date,
            "",
            &fields.vehicle,
            &fields.plate,
            &fields.odometer_in,
            &fields.odometer_out,
            &fields.items_to_check,
            &fields.notes,
            &fields.step,
            &fields.wheel_key,
            &fields.jack,
            &fields.triangle,
        ];

        Self {
            entries: TOKENS
                .into_iter()
                .zip(values)
                .map(|(token, value)| (token, value.to_string()))
                .collect(),
        }
    }

    /// Value of a token.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (*name, value.as_str()))
    }

    /// Compile into markers for the template engine.
    pub fn placeholders(&self) -> Result<Placeholders> {
        Placeholders::new(self.iter())
    }
}

/// Source of the current date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// The local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A clock stopped at one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_fields() -> OrderFields {
        OrderFields {
            vehicle: "  Gol ".to_string(),
            plate: "ABC1234\n".to_string(),
            odometer_in: "1000".to_string(),
            odometer_out: " 1200".to_string(),
            items_to_check: "pneus\nfreios\n\n".to_string(),
            notes: "  ".to_string(),
            step: "s".to_string(),
            wheel_key: "n ".to_string(),
            jack: "S".to_string(),
            triangle: String::new(),
        }
    }

    #[test]
    fn test_normalization() {
        let fields = raw_fields().normalized();
        assert_eq!(fields.vehicle, "Gol");
        assert_eq!(fields.plate, "ABC1234");
        assert_eq!(fields.odometer_out, "1200");
        assert_eq!(fields.items_to_check, "pneus\nfreios");
        assert_eq!(fields.notes, "");
        assert_eq!(fields.step, "S");
        // Flags keep their whitespace
        assert_eq!(fields.wheel_key, "N ");
        assert_eq!(fields.triangle, "");
    }

    #[test]
    fn test_mapping_has_every_token() {
        let map = PlaceholderMap::new("007/2024", "05/03/2024", &raw_fields().normalized());
        let names: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, TOKENS);

        assert_eq!(map.get("NUM_OS"), Some("007/2024"));
        assert_eq!(map.get("DATA_ATUAL"), Some("05/03/2024"));
        assert_eq!(map.get("DATA_SOLICITACAO"), Some("05/03/2024"));
        assert_eq!(map.get("DATA_DEVOLUCAO"), Some(""));
        assert_eq!(map.get("PLACA"), Some("ABC1234"));
        assert_eq!(map.get("MACACO"), Some("S"));
        assert_eq!(map.get("numero_os"), None);
        assert_eq!(map.placeholders().unwrap().len(), 14);
    }

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }
}
