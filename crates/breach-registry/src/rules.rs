use crate::catalog::InstrumentCatalog;
use crate::panel::ResolvedSeries;
use crate::shapes::*;
use crate::thresholds::BreachThresholds;
use monitor_core::{BreachRow, TimeSeries};
use rolling_stats::{has_data, month_avg};

/// Evaluates the fixed breach catalog over resolved daily series.
#[derive(Debug, Clone, Default)]
pub struct BreachRegistry {
    catalog: InstrumentCatalog,
    thresholds: BreachThresholds,
}

impl BreachRegistry {
    pub fn new(catalog: InstrumentCatalog, thresholds: BreachThresholds) -> Self {
        Self {
            catalog,
            thresholds,
        }
    }

    pub fn catalog(&self) -> &InstrumentCatalog {
        &self.catalog
    }

    pub fn thresholds(&self) -> &BreachThresholds {
        &self.thresholds
    }

    /// Run every rule in catalog order. Rules whose inputs are missing or too short emit
    /// no row.
    pub fn evaluate(&self, data: &ResolvedSeries) -> Vec<BreachRow> {
        let mut rows = Vec::new();

        self.single_series_rules(data, &mut rows);
        self.spread_rules(data, &mut rows);
        self.monthly_rules(data, &mut rows);
        self.korea_cds_rules(data, &mut rows);
        self.inversion_rule(data, &mut rows);
        self.country_cds_rules(data, &mut rows);
        self.corporate_rules(data, &mut rows);
        self.equity_rules(data, &mut rows);
        self.fra_ois_rule(data, &mut rows);

        let breached = rows.iter().filter(|r| r.has_breach()).count();
        tracing::info!("Breach catalog: {} rows, {} breached", rows.len(), breached);
        rows
    }

    fn ticker(&self, key: &str) -> String {
        self.catalog.ticker(key).to_string()
    }

    fn pair_ticker(&self, a: &str, b: &str, sep: &str) -> String {
        format!("{}{}{}", self.ticker(a), sep, self.ticker(b))
    }

    /// KR rates, the two 3M-average deviations, USDKRW, KOSPI, VKOSPI and KRW implied vol.
    fn single_series_rules(&self, data: &ResolvedSeries, rows: &mut Vec<BreachRow>) {
        let t = &self.thresholds;
        let two_sided = |limit: f64, decimals| Horizon::new(Trigger::AbsAtLeast(limit), decimals);

        let dual = [
            (
                "KR3Y",
                "KR 3Y KTB Yield",
                Unit::Bp,
                two_sided(t.kr3y_1d_bp, 0),
                two_sided(t.kr3y_10d_bp, 0),
                "KRW 3Y: yield change in bp",
            ),
            (
                "KR10Y",
                "KR 10Y KTB Yield",
                Unit::Bp,
                two_sided(t.kr10y_1d_bp, 0),
                two_sided(t.kr10y_10d_bp, 0),
                "KRW 10Y: yield change in bp",
            ),
        ];
        for (key, metric, unit, one, ten, note) in dual {
            if let Some(s) = data.get(key) {
                rows.extend(dual_horizon(metric, &self.ticker(key), s, unit, one, ten, note));
            }
        }

        for (key, metric) in [("US10Y", "US 10Y vs 3M Avg"), ("TSFR6M", "TSFR 6M vs 3M Avg")] {
            if let Some(s) = data.get(key) {
                rows.extend(baseline_deviation(metric, &self.ticker(key), s, t.g3m_dev_bp));
            }
        }

        let dual = [
            (
                "USDKRW",
                "USDKRW Spot",
                Unit::Pct,
                two_sided(t.usdkrw_1d_pct, 1),
                two_sided(t.usdkrw_10d_pct, 1),
                "USD/KRW: change in %",
            ),
            (
                "KOSPI",
                "KOSPI Index",
                Unit::Pct,
                Horizon::new(Trigger::AtMost(t.kospi_1d_down_pct), 1),
                Horizon::new(Trigger::AtMost(t.kospi_10d_down_pct), 1),
                "declines only",
            ),
            (
                "VKOSPI",
                "VKOSPI (Vol Index)",
                Unit::Pp,
                Horizon::new(Trigger::AtLeast(t.vkospi_1d_up_pp), 1),
                Horizon::new(Trigger::AtLeast(t.vkospi_10d_up_pp), 1),
                "rises only (pp)",
            ),
            (
                "KRW_IV1Y",
                "USDKRW 1Y Implied Vol",
                Unit::Pp,
                two_sided(t.krw_iv_1d_pp, 1),
                two_sided(t.krw_iv_10d_pp, 1),
                "absolute pp change",
            ),
        ];
        for (key, metric, unit, one, ten, note) in dual {
            if let Some(s) = data.get(key) {
                rows.extend(dual_horizon(metric, &self.ticker(key), s, unit, one, ten, note));
            }
        }
    }

    /// OIS 1Y - TSFR 1M MTD spread, KR 1Y - base rate, base - call.
    fn spread_rules(&self, data: &ResolvedSeries, rows: &mut Vec<BreachRow>) {
        let t = &self.thresholds;

        if let Some((ois, tsfr)) = usable_pair(data, "SOFR_OIS_1Y", "TSFR1M") {
            let ois_mtd = month_avg(ois, 0);
            let tsfr_mtd = month_avg(tsfr, 0);
            let spread = ois_mtd.zip(tsfr_mtd).map(|(a, b)| (a - b) * 100.0);
            let trigger = Trigger::AtLeast(t.ois1y_minus_tsfr1m_mtd_bp);
            rows.push(monthly_change(
                "USD OIS 1Y - TSFR 1M (MTD avg)",
                &self.pair_ticker("SOFR_OIS_1Y", "TSFR1M", " vs "),
                spread,
                |v| format!("{:.1}bp (MTD spread)", v),
                trigger,
                trigger.label("bp", 0),
                || {
                    format!(
                        "MTD OIS1Y={:.4}, TSFR1M={:.4}",
                        ois_mtd.unwrap_or_default(),
                        tsfr_mtd.unwrap_or_default()
                    )
                },
            ));
        }

        if let Some((kr1y, base)) = usable_pair(data, "KR1Y", "KRBASERATE") {
            rows.push(spread_level(
                "KR 1Y - BaseRate (level)",
                &self.pair_ticker("KR1Y", "KRBASERATE", " - "),
                &spread_bp(kr1y, base, "KR1Y-BASE"),
                Trigger::Below(t.kr1y_minus_base_level_bp),
                t.kr1y_minus_base_days,
                "daily spread level",
            ));
        }

        if let Some((base, call)) = usable_pair(data, "KRBASERATE", "KRCALL") {
            rows.push(spread_level(
                "KR Base - Call (level)",
                &self.pair_ticker("KRBASERATE", "KRCALL", " - "),
                &spread_bp(base, call, "BASE-CALL"),
                Trigger::Above(t.base_minus_call_bp),
                1,
                "level",
            ));
        }
    }

    /// TSFR 3M and JPY TIBOR 3M: current month average against the previous month.
    fn monthly_rules(&self, data: &ResolvedSeries, rows: &mut Vec<BreachRow>) {
        let t = &self.thresholds;
        let rules = [
            ("TSFR3M", "TSFR 3M (MTD - PrevM)", t.tsfr3m_prev_month_abs_bp),
            ("JPY_TIBOR3M", "JPY TIBOR 3M (MTD - PrevM)", t.jpy_tibor3m_prev_month_abs_bp),
        ];

        for (key, metric, limit) in rules {
            let Some(s) = usable(data, key) else { continue };
            let (cur, prev) = (month_avg(s, 0), month_avg(s, 1));
            let diff = cur.zip(prev).map(|(c, p)| (c - p) * 100.0);
            let trigger = Trigger::AbsAbove(limit);
            rows.push(monthly_change(
                metric,
                &self.ticker(key),
                diff,
                |v| format!("{:.1}bp (Δavg)", v),
                trigger,
                trigger.label("bp", 0),
                || format_month_pair(cur, prev, 4),
            ));
        }
    }

    /// Korea 5Y CDS against its previous-month and three-months-ago averages.
    fn korea_cds_rules(&self, data: &ResolvedSeries, rows: &mut Vec<BreachRow>) {
        let t = &self.thresholds;
        let Some(cds) = usable(data, "Korea") else {
            return;
        };
        let ticker = self.ticker("Korea");

        let baselines = [
            (1, "KR 5Y CDS vs PrevM (3D consec)", "PrevM", t.kr5y_cds_prev_month_bp),
            (3, "KR 5Y CDS vs M-3 (3D consec)", "M-3", t.kr5y_cds_three_months_ago_bp),
        ];
        for (months_ago, metric, label, limit) in baselines {
            // no row without a baseline month
            let Some(avg) = month_avg(cds, months_ago) else {
                continue;
            };
            let deviation = cds.map(format!("Korea-{}", label), |v| v - avg);
            let mut row = spread_level(
                metric,
                &ticker,
                &deviation,
                Trigger::Above(limit),
                t.kr5y_cds_days,
                &format!("{} avg={:.1}bp", label, avg),
            );
            row.latest = cds.last();
            rows.push(row);
        }
    }

    /// KR 10Y - 3Y term spread at or below zero for consecutive days.
    fn inversion_rule(&self, data: &ResolvedSeries, rows: &mut Vec<BreachRow>) {
        let Some((kr10y, kr3y)) = usable_pair(data, "KR10Y", "KR3Y") else {
            return;
        };
        let days = self.thresholds.kr_10y_3y_inversion_days;
        rows.push(spread_level(
            "KR Term Spread 10Y-3Y (5D inversion)",
            &self.pair_ticker("KR10Y", "KR3Y", " - "),
            &spread_bp(kr10y, kr3y, "KR10Y-KR3Y"),
            Trigger::AtMost(0.0),
            days,
            &format!("10Y-3Y ≤ 0bp for {} consecutive days", days),
        ));
    }

    /// Every non-Korea sovereign CDS: MTD average against the previous month, in percent.
    fn country_cds_rules(&self, data: &ResolvedSeries, rows: &mut Vec<BreachRow>) {
        let trigger = Trigger::Above(self.thresholds.cds_prev_month_pct_up);

        for instrument in self.catalog.cds_countries() {
            if instrument.key == "Korea" {
                continue;
            }
            let Some(s) = usable(data, &instrument.key) else {
                continue;
            };
            let (mtd, prev) = (month_avg(s, 0), month_avg(s, 1));
            let pct_up = match (mtd, prev) {
                (Some(m), Some(p)) if p != 0.0 => Some((m / p - 1.0) * 100.0),
                _ => None,
            };
            let row = monthly_change(
                &format!("CDS 5Y: {} (MTD vs PrevM)", instrument.key),
                &instrument.ticker,
                pct_up,
                |v| format!("{:.1}%", v),
                trigger,
                trigger.label("%", 0),
                || format_month_pair(mtd, prev, 1),
            );
            rows.push(row.with_latest(s.last()));
        }
    }

    /// KTB 3Y / corporate AA- 3Y ratio, financial 1Y - CD 3M and financial 1Y AAA - KTB 1Y.
    fn corporate_rules(&self, data: &ResolvedSeries, rows: &mut Vec<BreachRow>) {
        let t = &self.thresholds;

        if let Some((ktb, corp)) = usable_pair(data, "KR3Y", "KR_CORP3Y_AA-") {
            let ratio = |months_ago| match (month_avg(ktb, months_ago), month_avg(corp, months_ago)) {
                (Some(k), Some(c)) if c != 0.0 => Some(k / c),
                _ => None,
            };
            let (cur, prev) = (ratio(0), ratio(1));
            let change = match (cur, prev) {
                (Some(c), Some(p)) if p != 0.0 => Some((c / p - 1.0) * 100.0),
                _ => None,
            };
            let trigger = Trigger::Above(t.ktb3y_corp3y_ratio_prev_month_pct);
            rows.push(monthly_change(
                "KTB3Y / Corp(AA-) 3Y (MTD vs PrevM)",
                "KR3Y / KR_CORP3Y_AA-",
                change,
                |v| format!("{:.1}%", v),
                trigger,
                trigger.label("%", 0),
                || format_month_pair(cur, prev, 4),
            ));
        }

        if let Some((fin, cd)) = usable_pair(data, "KR_FIN1Y_AAA", "KR_CD3M") {
            let (fin_mtd, cd_mtd) = (month_avg(fin, 0), month_avg(cd, 0));
            let spread = fin_mtd.zip(cd_mtd).map(|(f, c)| (f - c) * 100.0);
            let trigger = Trigger::AtLeast(t.fin1y_minus_cd3m_mtd_bp);
            rows.push(monthly_change(
                "(MTD) Fin 1Y - CD 3M",
                &self.pair_ticker("KR_FIN1Y_AAA", "KR_CD3M", " - "),
                spread,
                |v| format!("{:.1}bp", v),
                trigger,
                trigger.label("bp", 0),
                || {
                    format!(
                        "MTD Fin1Y={:.4}, CD3M={:.4}",
                        fin_mtd.unwrap_or_default(),
                        cd_mtd.unwrap_or_default()
                    )
                },
            ));
        }

        if let Some((fin, ktb1y)) = usable_pair(data, "KR_FIN1Y_AAA", "KR1Y") {
            rows.push(spread_level(
                "Fin 1Y(AAA) - KTB 1Y (5D consec ≥50bp)",
                &self.pair_ticker("KR_FIN1Y_AAA", "KR1Y", " - "),
                &spread_bp(fin, ktb1y, "FIN1Y-KR1Y"),
                Trigger::AtLeast(t.fin1y_aaa_minus_ktb1y_bp),
                t.fin1y_aaa_minus_ktb1y_days,
                "daily spread level",
            ));
        }
    }

    fn equity_rules(&self, data: &ResolvedSeries, rows: &mut Vec<BreachRow>) {
        let t = &self.thresholds;
        let dual = [
            (
                "SPX",
                "S&P 500",
                Horizon::new(Trigger::AtMost(t.spx_1d_down_pct), 1),
                Horizon::new(Trigger::AtMost(t.spx_10d_down_pct), 1),
                "declines only",
            ),
            (
                "SX5E",
                "EuroStoxx50",
                Horizon::new(Trigger::AbsAtLeast(t.sx5e_1d_abs_pct), 1),
                Horizon::new(Trigger::AtMost(t.sx5e_10d_down_pct), 1),
                "1D absolute, 10D declines only",
            ),
        ];
        for (key, metric, one, ten, note) in dual {
            if let Some(s) = data.get(key) {
                rows.extend(dual_horizon(metric, &self.ticker(key), s, Unit::Pct, one, ten, note));
            }
        }
    }

    fn fra_ois_rule(&self, data: &ResolvedSeries, rows: &mut Vec<BreachRow>) {
        let Some(s) = usable(data, "US_FRAOIS_3M") else {
            return;
        };
        let (cur, prev) = (month_avg(s, 0), month_avg(s, 1));
        let diff = cur.zip(prev).map(|(c, p)| (c - p) * 100.0);
        let trigger = Trigger::Above(self.thresholds.fraois_prev_month_bp);
        rows.push(monthly_change(
            "USD 3M FRA-OIS (MTD - PrevM)",
            &self.ticker("US_FRAOIS_3M"),
            diff,
            |v| format!("{:.1}bp (Δavg)", v),
            trigger,
            trigger.label("bp", 0),
            || format_month_pair(cur, prev, 2),
        ));
    }
}

fn usable<'a>(data: &'a ResolvedSeries, key: &str) -> Option<&'a TimeSeries> {
    data.get(key).filter(|s| has_data(s.values(), MIN_POINTS))
}

fn usable_pair<'a>(
    data: &'a ResolvedSeries,
    a: &str,
    b: &str,
) -> Option<(&'a TimeSeries, &'a TimeSeries)> {
    usable(data, a).zip(usable(data, b))
}

fn format_month_pair(cur: Option<f64>, prev: Option<f64>, decimals: usize) -> String {
    format!(
        "MTD={:.*}, PrevM={:.*}",
        decimals,
        cur.unwrap_or_default(),
        decimals,
        prev.unwrap_or_default()
    )
}
