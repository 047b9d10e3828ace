use serde::{Deserialize, Serialize};

/// Fields always requested so a missing preferred field can still fall back.
pub const FALLBACK_FIELDS: [&str; 6] = [
    "LAST_PRICE",
    "MID",
    "PX_LAST",
    "PX_MID",
    "YLD_YTM_MID",
    "YLD_YTM_LAST",
];

pub const DEFAULT_GENERAL_FIELDS: [&str; 4] = ["PX_LAST", "LAST_PRICE", "PX_MID", "MID"];
pub const DEFAULT_CDS_FIELDS: [&str; 3] = ["LAST_PRICE", "MID", "PX_LAST"];

const RATE_FIELDS: [&str; 3] = ["YLD_YTM_MID", "YLD_YTM_LAST", "PX_LAST"];
const PX_ONLY: [&str; 1] = ["PX_LAST"];
const PX_THEN_YIELD: [&str; 3] = ["PX_LAST", "YLD_YTM_MID", "LAST_PRICE"];
const MONEY_MARKET: [&str; 2] = ["PX_LAST", "LAST_PRICE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    General,
    Cds,
}

/// A monitored instrument: catalog key, provider ticker and preferred fields in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    pub key: String,
    pub ticker: String,
    pub kind: InstrumentKind,
    pub fields: Vec<String>,
}

impl Instrument {
    fn new(key: &str, ticker: &str, kind: InstrumentKind, fields: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            ticker: ticker.to_string(),
            kind,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentCatalog {
    instruments: Vec<Instrument>,
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        use InstrumentKind::General;

        let mut instruments = vec![
            Instrument::new("KR1Y", "SKTB1YAY Index", General, &RATE_FIELDS),
            Instrument::new("KR3Y", "SKTB3YAY Index", General, &RATE_FIELDS),
            Instrument::new("KR10Y", "SKTB10YY Index", General, &RATE_FIELDS),
            Instrument::new("US10Y", "USGG10YR Index", General, &["PX_LAST", "YLD_YTM_MID"]),
            Instrument::new("TSFR6M", "TSFR6M Index", General, &PX_ONLY),
            Instrument::new("TSFR3M", "TSFR3M Index", General, &PX_ONLY),
            Instrument::new("TSFR1M", "TSFR1M Index", General, &PX_ONLY),
            Instrument::new("SOFR_OIS_1Y", "USOSFR1 BGN Curncy", General, &PX_THEN_YIELD),
            Instrument::new("USDKRW", "USDKRW Curncy", General, &PX_ONLY),
            Instrument::new("KOSPI", "KOSPI Index", General, &PX_ONLY),
            Instrument::new("VKOSPI", "VKOSPI Index", General, &PX_ONLY),
            Instrument::new("KRW_IV1Y", "USDKRWV1Y BGN Curncy", General, &PX_ONLY),
            Instrument::new("KRBASERATE", "KORP7D Index", General, &MONEY_MARKET),
            Instrument::new("KRCALL", "KOCR Index", General, &MONEY_MARKET),
            Instrument::new("KR_CD3M", "KWCDC CMPN Curncy", General, &MONEY_MARKET),
            Instrument::new("KR_FIN1Y_AAA", "KRFN1YAA Index", General, &PX_THEN_YIELD),
            Instrument::new("KR_CORP3Y_AA-", "KRCORP3YAA- Index", General, &PX_THEN_YIELD),
            Instrument::new("SPX", "SPX Index", General, &PX_ONLY),
            Instrument::new("SX5E", "SX5E Index", General, &PX_ONLY),
            Instrument::new("JPY_TIBOR3M", "TI0003M Index", General, &MONEY_MARKET),
            Instrument::new("US_FRAOIS_3M", "USSFRAOIS Index", General, &MONEY_MARKET),
        ];

        let cds = [
            ("Korea", "KOREA"),
            ("United States", "US"),
            ("Japan", "JGB"),
            ("China", "CHINAGOV"),
            ("Vietnam", "VIETNM"),
            ("Kazakhstan", "KAZAKS"),
            ("Germany", "GERMAN"),
            ("United Kingdom", "UK"),
            ("India", "INDIA"),
            ("Mexico", "MEX"),
            ("Indonesia", "INDON"),
            ("Türkiye", "TURKEY"),
            ("Canada", "CANPAC"),
            ("Hong Kong", "HONGK"),
            ("Australia", "AUSTLA"),
            ("Philippines", "PHILIP"),
            ("Singapore", "SINGP"),
            ("UAE", "DPWDU"),
        ];
        for (country, code) in cds {
            // US sovereign CDS trades in EUR
            let currency = if country == "United States" { "EUR" } else { "USD" };
            instruments.push(Instrument::new(
                country,
                &format!("{} CDS {} SR 5Y D14 Curncy", code, currency),
                InstrumentKind::Cds,
                &DEFAULT_CDS_FIELDS,
            ));
        }

        Self { instruments }
    }
}

impl InstrumentCatalog {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn get(&self, key: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.key == key)
    }

    /// Provider ticker for a key; unknown keys echo back unchanged.
    pub fn ticker<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map(|i| i.ticker.as_str()).unwrap_or(key)
    }

    pub fn key_for_ticker(&self, ticker: &str) -> Option<&str> {
        self.instruments
            .iter()
            .find(|i| i.ticker == ticker)
            .map(|i| i.key.as_str())
    }

    /// Field preference for a key, falling back to the general default.
    pub fn fields_for(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(i) => i.fields.clone(),
            None => DEFAULT_GENERAL_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Union of every preferred field plus the fallback set, sorted.
    pub fn request_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = self
            .instruments
            .iter()
            .flat_map(|i| i.fields.iter().cloned())
            .chain(FALLBACK_FIELDS.iter().map(|f| f.to_string()))
            .collect();
        fields.sort();
        fields.dedup();
        fields
    }

    pub fn tickers(&self) -> Vec<String> {
        self.instruments.iter().map(|i| i.ticker.clone()).collect()
    }

    pub fn cds_countries(&self) -> impl Iterator<Item = &Instrument> + '_ {
        self.instruments
            .iter()
            .filter(|i| i.kind == InstrumentKind::Cds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_contents() {
        let catalog = InstrumentCatalog::default();
        assert_eq!(catalog.instruments().len(), 21 + 18);
        assert_eq!(catalog.ticker("KR10Y"), "SKTB10YY Index");
        assert_eq!(catalog.ticker("Korea"), "KOREA CDS USD SR 5Y D14 Curncy");
        assert_eq!(catalog.ticker("United States"), "US CDS EUR SR 5Y D14 Curncy");
        assert_eq!(catalog.key_for_ticker("KOCR Index"), Some("KRCALL"));
        assert_eq!(catalog.cds_countries().count(), 18);
    }

    #[test]
    fn test_field_preferences() {
        let catalog = InstrumentCatalog::default();
        assert_eq!(catalog.fields_for("KR3Y"), vec!["YLD_YTM_MID", "YLD_YTM_LAST", "PX_LAST"]);
        assert_eq!(catalog.fields_for("Japan"), vec!["LAST_PRICE", "MID", "PX_LAST"]);
        assert_eq!(catalog.fields_for("UNKNOWN"), vec!["PX_LAST", "LAST_PRICE", "PX_MID", "MID"]);

        let fields = catalog.request_fields();
        assert!(fields.contains(&"PX_MID".to_string()));
        assert!(fields.windows(2).all(|w| w[0] < w[1]));
    }
}
