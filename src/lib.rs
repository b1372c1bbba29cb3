pub mod chart;
pub mod config;
pub mod convert;
pub mod history;
pub mod log;
pub mod providers;
pub mod rates;
pub mod suggest;
pub mod ui;

use anyhow::Result;
use tracing::{debug, info};

use crate::chart::{ChartPane, RateChart};
use crate::config::AppConfig;
use crate::convert::{Conversion, ConversionRequest, ConvertError};
use crate::history::HistoryStore;
use crate::providers::open_er::OpenErApiProvider;
use crate::rates::RateProvider;

pub enum AppCommand {
    Convert {
        amount: String,
        from: String,
        to: String,
    },
    Currencies {
        query: Option<String>,
    },
    History,
    ClearHistory,
}

/// One converter per invocation. Owns the rate provider, the history store
/// and the chart pane rather than sharing them as process globals.
pub struct Converter {
    config: AppConfig,
    provider: Box<dyn RateProvider>,
    history: HistoryStore,
    chart: ChartPane,
}

impl Converter {
    pub fn new(config: AppConfig, provider: Box<dyn RateProvider>, history: HistoryStore) -> Self {
        Converter {
            config,
            provider,
            history,
            chart: ChartPane::new(),
        }
    }

    pub fn base_currency(&self) -> &str {
        &self.config.base_currency
    }

    /// Runs a full conversion: resolves the requested codes against the
    /// live currency list, fetches the source-based rate table, converts,
    /// then records the history entry and draws the trend chart.
    ///
    /// On any failure nothing is recorded and no chart is drawn.
    pub async fn convert(
        &mut self,
        request: ConversionRequest,
    ) -> Result<Conversion, ConvertError> {
        let codes = self
            .provider
            .fetch_rates(&self.config.base_currency)
            .await
            .map_err(ConvertError::Rate)?;
        let mut known: Vec<&str> = codes.keys().map(String::as_str).collect();
        known.sort_unstable();

        let from = suggest::resolve(&request.from, &known)
            .ok_or_else(|| ConvertError::UnknownCurrency(request.from.clone()))?
            .to_string();
        let to = suggest::resolve(&request.to, &known)
            .ok_or_else(|| ConvertError::UnknownCurrency(request.to.clone()))?
            .to_string();
        debug!("Resolved request currencies to {} -> {}", from, to);
        let request = ConversionRequest { from, to, ..request };

        let rates = self
            .provider
            .fetch_rates(&request.from)
            .await
            .map_err(ConvertError::Rate)?;
        let conversion = convert::convert(&request, &rates)?;

        self.history.append(conversion.to_history_entry());
        self.chart
            .render(&conversion.from, &conversion.to, conversion.rate);

        Ok(conversion)
    }

    /// Lists known codes with their rate against the configured base. With
    /// a query, returns the suggestions for it, best match first.
    pub async fn currencies(&self, query: Option<&str>) -> Result<Vec<(String, f64)>> {
        let rates = self
            .provider
            .fetch_rates(&self.config.base_currency)
            .await?;

        let listed = match query {
            Some(query) => {
                let known: Vec<&str> = rates.keys().map(String::as_str).collect();
                suggest::top_matches(query, known, 10)
                    .into_iter()
                    .map(|code| (code.to_string(), rates[code]))
                    .collect()
            }
            None => {
                let mut all: Vec<(String, f64)> =
                    rates.iter().map(|(code, rate)| (code.clone(), *rate)).collect();
                all.sort_by(|a, b| a.0.cmp(&b.0));
                all
            }
        };
        Ok(listed)
    }

    pub fn chart(&self) -> Option<&RateChart> {
        self.chart.current()
    }

    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = AppConfig::load(config_path)?;
    debug!("Loaded config: {config:#?}");

    let provider = OpenErApiProvider::new(&config.provider.base_url);
    let history = HistoryStore::open(config.history_path()?);
    let mut app = Converter::new(config, Box::new(provider), history);

    match command {
        AppCommand::Convert { amount, from, to } => run_convert(&mut app, &amount, &from, &to).await,
        AppCommand::Currencies { query } => run_currencies(&app, query.as_deref()).await,
        AppCommand::History => {
            show_history(&app);
            Ok(())
        }
        AppCommand::ClearHistory => {
            app.clear_history();
            println!("Conversion history cleared");
            Ok(())
        }
    }
}

async fn run_convert(app: &mut Converter, amount: &str, from: &str, to: &str) -> Result<()> {
    let request = match ConversionRequest::parse(amount, from, to) {
        Ok(request) => request,
        Err(e) => {
            println!("{}", ui::style_text(&format!("🔴 {e}"), ui::StyleType::Error));
            return Err(e.into());
        }
    };

    let pb = ui::new_spinner("Fetching rates...");
    let result = app.convert(request).await;
    pb.finish_and_clear();

    match result {
        Ok(conversion) => {
            println!(
                "💱 {}",
                ui::style_text(&conversion.to_string(), ui::StyleType::Result)
            );
            if let Some(chart) = app.chart() {
                println!("\n{}", chart.as_str());
            }
            Ok(())
        }
        Err(e) => {
            println!("{}", ui::style_text(&format!("⚠️ {e}"), ui::StyleType::Error));
            Err(e.into())
        }
    }
}

async fn run_currencies(app: &Converter, query: Option<&str>) -> Result<()> {
    let pb = ui::new_spinner("Fetching currency list...");
    let result = app.currencies(query).await;
    pb.finish_and_clear();

    let listed = match result {
        Ok(listed) => listed,
        Err(e) => {
            println!(
                "{}",
                ui::style_text("⚠️ Error fetching currency list", ui::StyleType::Error)
            );
            return Err(e);
        }
    };

    if listed.is_empty() {
        println!("{}", ui::style_text("No matching currencies", ui::StyleType::Subtle));
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell(&format!("Rate ({})", app.base_currency())),
    ]);
    for (code, rate) in &listed {
        table.add_row(vec![comfy_table::Cell::new(code), ui::rate_cell(*rate)]);
    }
    println!("{table}");
    Ok(())
}

fn show_history(app: &Converter) {
    println!(
        "{}",
        ui::style_text("Recent conversions", ui::StyleType::Title)
    );
    if app.history().is_empty() {
        println!("{}", ui::style_text("(none)", ui::StyleType::Subtle));
        return;
    }
    for entry in app.history() {
        println!("{entry}");
    }
}
