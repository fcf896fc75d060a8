use crate::statistic::{
    summary::{PerformanceReport, PerformanceSummary},
    time::TimeInterval,
};
use prettytable::{Cell, Row, Table};

impl<Interval> PerformanceReport<Interval>
where
    Interval: TimeInterval,
{
    /// Render the [`PerformanceReport`] as a table, with Alpha & Sharpe Ratio shown both per
    /// period and scaled to the `annual` [`TimeInterval`].
    pub fn table<Annual>(&self, annual: Annual) -> Table
    where
        Annual: TimeInterval,
    {
        let mut table = Table::new();

        // Styling
        table.set_format(*prettytable::format::consts::FORMAT_BOX_CHARS);

        // Title row spanning all columns
        let num_columns = self.securities.len() + 1;
        let mut title_row = Row::new(vec![]);
        let mut title_cell = Cell::new(&format!(
            "Performance vs {} ({} to {})",
            self.benchmark, self.range.start, self.range.end
        ))
        .style_spec("bcB");
        title_cell.set_hspan(num_columns);
        title_row.add_cell(title_cell);
        table.add_row(title_row);

        // Extract TimeInterval name (eg/ Monthly, Daily, etc)
        let interval = match self.securities.first() {
            Some((_, summary)) => summary.sharpe_ratio.interval.name(),
            None => return table,
        };
        let annual_name = annual.name();

        // Header row (eg/ Metric | AAPL-US | MSFT-US | ... )
        let mut header_row = Row::new(vec![Cell::new("").style_spec("bcB")]);
        for security in self.securities.keys() {
            header_row.add_cell(Cell::new(security.as_ref()).style_spec("bcB"));
        }
        table.add_row(header_row);

        // Add metric rows
        self.add_metric_row(&mut table, "Observations", |summary| {
            summary.observations.to_string()
        });
        self.add_metric_row(&mut table, "Total Return", |summary| {
            format!("{:.2}%", summary.total_return.value * 100.0)
        });
        self.add_metric_row(&mut table, "CAGR", |summary| {
            format!("{:.2}%", summary.cagr.value * 100.0)
        });
        self.add_metric_row(&mut table, &format!("Alpha {interval}"), |summary| {
            format!("{:.4}", summary.alpha.value)
        });
        self.add_metric_row(&mut table, &format!("Alpha {annual_name}"), |summary| {
            format!("{:.4}", summary.alpha.clone().scale(annual).value)
        });
        self.add_metric_row(&mut table, "Beta", |summary| {
            format!("{:.3}", summary.beta.value)
        });
        self.add_metric_row(&mut table, &format!("Sharpe {interval}"), |summary| {
            format!("{:.3}", summary.sharpe_ratio.value)
        });
        self.add_metric_row(&mut table, &format!("Sharpe {annual_name}"), |summary| {
            format!("{:.3}", summary.sharpe_ratio.clone().scale(annual).value)
        });

        table
    }

    fn add_metric_row<F>(&self, table: &mut Table, label: &str, format_value: F)
    where
        F: Fn(&PerformanceSummary<Interval>) -> String,
    {
        let mut row = Row::new(vec![Cell::new(label).style_spec("bcB")]);
        for summary in self.securities.values() {
            row.add_cell(Cell::new(&format_value(summary)));
        }
        table.add_row(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        FnvIndexMap,
        data::{DateRange, SecurityId},
        statistic::{
            metric::{
                cagr::Cagr,
                capm::{Alpha, Beta},
                sharpe::SharpeRatio,
                total_return::TotalReturn,
            },
            time::{Annual365, Monthly},
        },
    };
    use chrono::NaiveDate;
    use smol_str::SmolStr;

    fn report(securities: &[&str]) -> PerformanceReport<Monthly> {
        let securities = securities
            .iter()
            .map(|name| {
                let security = SecurityId::new(*name);
                let summary = PerformanceSummary {
                    security: security.clone(),
                    observations: 12,
                    total_return: TotalReturn { value: 0.1234 },
                    cagr: Cagr {
                        value: 0.1235,
                        years: 1.0,
                    },
                    alpha: Alpha {
                        value: 0.001,
                        interval: Monthly,
                    },
                    beta: Beta { value: 1.25 },
                    sharpe_ratio: SharpeRatio {
                        value: 0.5,
                        interval: Monthly,
                    },
                };
                (security, summary)
            })
            .collect::<FnvIndexMap<_, _>>();

        PerformanceReport {
            benchmark: SmolStr::new("SP500-TR"),
            range: DateRange::new(
                NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2019, 12, 31).unwrap(),
            ),
            risk_free_return: 0.0015,
            securities,
        }
    }

    #[test]
    fn test_table_has_row_per_metric_and_column_per_security() {
        let table = report(&["ALPHA-US", "BRAVO-US"]).table(Annual365);

        // title + header + 8 metrics
        assert_eq!(table.len(), 10);

        let rendered = table.to_string();
        assert!(rendered.contains("ALPHA-US"));
        assert!(rendered.contains("BRAVO-US"));
        assert!(rendered.contains("Sharpe Annual(365)"));
        assert!(rendered.contains("12.34%"));
        assert!(rendered.contains("0.0120"));
    }

    #[test]
    fn test_table_without_securities_has_only_title() {
        let table = report(&[]).table(Annual365);
        assert_eq!(table.len(), 1);
    }
}
