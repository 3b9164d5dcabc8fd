//! The metrics screen: one frame per refresh tick, redrawn in place on a
//! terminal or appended with a delimiter when output is captured.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crossterm::cursor::{Hide, MoveTo, MoveUp, Show};
use crossterm::style::{style, Color, Stylize};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use fluxd_consensus::money::format_money;
use tokio::sync::watch;
use tracing::info;

use crate::chain::NodeView;
use crate::config::MetricsConfig;
use crate::estimate::estimate_from_params;
use crate::messages::MessageKind;
use crate::refresh::Tick;
use crate::registry::{MetricsRegistry, DONE_LOADING};
use crate::text::{format_paragraph, rows_for, uptime_parts};

pub const DEFAULT_COLUMNS: usize = 80;
const DELIMITER: &str = "----------------------------------------";

#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("metrics screen write failed: {0}")]
    Io(#[from] io::Error),
}

/// A composed frame and the number of terminal rows it covers.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub text: String,
    pub rows: usize,
    cols: usize,
}

impl Frame {
    fn new(cols: usize) -> Self {
        Self {
            text: String::new(),
            rows: 0,
            cols: cols.max(1),
        }
    }

    fn line(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        self.rows += rows_for(line, self.cols);
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn blank(&mut self) {
        self.line("");
    }
}

/// Hides the cursor for the lifetime of the guard when drawing in place.
/// Dropping it shows the cursor again, also when a frame panics.
struct CursorGuard<'a, W: Write> {
    out: &'a mut W,
    hidden: bool,
}

impl<'a, W: Write> CursorGuard<'a, W> {
    fn enter(out: &'a mut W, hide: bool) -> io::Result<Self> {
        if hide {
            execute!(out, Hide)?;
        }
        Ok(Self { out, hidden: hide })
    }
}

impl<W: Write> Drop for CursorGuard<'_, W> {
    fn drop(&mut self) {
        if self.hidden {
            let _ = execute!(self.out, Show);
        }
    }
}

/// Facts read from the node at the start of a tick. Fields are read one at
/// a time, so a frame may mix slightly different moments.
struct NodeFacts {
    height: i32,
    tip_median_time: i64,
    connections: usize,
    network_sol_ps: i64,
    initial_block_download: bool,
}

pub struct DashboardRenderer<N> {
    registry: Arc<MetricsRegistry>,
    node: Arc<N>,
    config: MetricsConfig,
}

impl<N: NodeView> DashboardRenderer<N> {
    pub fn new(registry: Arc<MetricsRegistry>, node: Arc<N>, config: MetricsConfig) -> Self {
        Self {
            registry,
            node,
            config,
        }
    }

    /// Draws frames until `shutdown` turns `true`.
    pub fn run<W: Write>(
        &self,
        out: &mut W,
        shutdown: watch::Receiver<bool>,
    ) -> Result<(), ScreenError> {
        info!(
            screen = self.config.screen,
            refresh_secs = self.registry.refresh.interval().as_secs(),
            "metrics screen started"
        );
        let mut guard = CursorGuard::enter(out, self.config.screen)?;
        let result = self.draw_until_cancelled(&mut *guard.out, &shutdown);
        drop(guard);
        info!("metrics screen stopped");
        result
    }

    fn draw_until_cancelled<W: Write>(
        &self,
        out: &mut W,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<(), ScreenError> {
        if self.config.screen {
            self.splash(out)?;
        }
        loop {
            if self.config.screen {
                queue!(out, Clear(ClearType::FromCursorDown))?;
            }
            // Scheduled before composing so an immediate refresh requested
            // while this frame is built or written is not overwritten.
            self.registry.refresh.schedule_next();
            let frame = self.compose_frame(self.terminal_width());
            out.write_all(frame.text.as_bytes())?;
            out.flush()?;

            if self.registry.refresh.wait_for_next_tick(shutdown) == Tick::Cancelled {
                return Ok(());
            }

            if self.config.screen && frame.rows > 0 {
                let rows = u16::try_from(frame.rows).unwrap_or(u16::MAX);
                queue!(out, MoveUp(rows))?;
            }
        }
    }

    pub fn splash<W: Write>(&self, out: &mut W) -> Result<(), ScreenError> {
        queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
        let mut frame = Frame::new(DEFAULT_COLUMNS);
        frame.line(self.paint("Thank you for running a Flux node!", Color::Green));
        frame.line(
            "This screen only reads local node state; nothing shown here is sent anywhere.",
        );
        frame.blank();
        out.write_all(frame.text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Builds the frame for one tick.
    ///
    /// Not a pure read: it reconciles the mined-block ledger (pruning
    /// orphans) and latches the loaded flag once the init message says so.
    pub fn compose_frame(&self, cols: usize) -> Frame {
        let mut frame = Frame::new(cols);
        let loaded = self.registry.is_loaded();

        if loaded {
            let facts = self.node_facts();
            self.stats_section(&mut frame, &facts);
            self.mining_section(&mut frame, &facts);
        }
        self.metrics_section(&mut frame, loaded);
        self.message_section(&mut frame, cols);
        self.init_message_section(&mut frame, loaded);

        if self.config.screen {
            frame.line("[Press Ctrl+C to exit] [Set 'showmetrics=0' to hide]");
        } else {
            frame.line(DELIMITER);
        }
        frame
    }

    fn node_facts(&self) -> NodeFacts {
        let (height, tip_median_time) = self
            .node
            .with_active_chain(|chain| (chain.height(), chain.tip_median_time()));
        NodeFacts {
            height,
            tip_median_time,
            connections: self.node.connection_count(),
            network_sol_ps: self.node.network_sol_ps(),
            initial_block_download: self.node.is_initial_block_download(),
        }
    }

    fn stats_section(&self, frame: &mut Frame, facts: &NodeFacts) {
        if facts.initial_block_download {
            let net_height = estimate_from_params(
                facts.height,
                facts.tip_median_time,
                self.node.chain_params(),
                unix_time_secs(),
            );
            let percent = if net_height > 0 {
                i64::from(facts.height) * 100 / i64::from(net_height)
            } else {
                0
            };
            let color = if percent == 100 {
                Color::Cyan
            } else {
                Color::Yellow
            };
            frame.line(format!(
                "     Downloading blocks | {} / ~{} ({})",
                facts.height,
                net_height,
                self.paint(format!("{percent}%"), color)
            ));
        } else {
            frame.line(format!(
                "           Block height | {}",
                self.paint(facts.height, Color::Cyan)
            ));
        }
        frame.line(format!(
            "            Connections | {}",
            self.paint(facts.connections, Color::Cyan)
        ));
        frame.line(format!(
            "  Network solution rate | {} Sol/s",
            self.paint(facts.network_sol_ps, Color::Cyan)
        ));
        if self.config.mining && self.registry.mining_timer.running() {
            frame.line(format!(
                "    Local solution rate | {} Sol/s",
                self.paint(format!("{:.4}", self.registry.local_sol_ps()), Color::Cyan)
            ));
        }
        frame.blank();
    }

    fn mining_section(&self, frame: &mut Frame, facts: &NodeFacts) {
        if self.config.mining {
            let workers = self.registry.mining_timer.active_user_count();
            if workers > 0 {
                frame.line(format!(
                    "You are mining with the {} solver on {} threads.",
                    self.paint(&self.config.solver, Color::Cyan),
                    self.paint(workers, Color::Cyan)
                ));
            } else if facts.connections == 0 {
                frame.line(self.paint(
                    "Mining is paused while waiting for connections.",
                    Color::Yellow,
                ));
            } else if facts.initial_block_download {
                frame.line(self.paint("Mining is paused while downloading blocks.", Color::Yellow));
            } else {
                frame.line(self.paint(
                    "Mining is paused (a JoinSplit may be in progress).",
                    Color::Yellow,
                ));
            }
        } else {
            frame.line(self.paint("You are currently not mining.", Color::Red));
            frame.line(self.paint(
                "To enable mining, add 'gen=1' to your flux.conf and restart.",
                Color::Yellow,
            ));
        }
        frame.blank();
    }

    fn metrics_section(&self, frame: &mut Frame, loaded: bool) {
        let uptime = uptime_parts(self.registry.uptime().as_secs())
            .into_iter()
            .map(|(value, unit)| format!("{} {unit}", self.paint(value, Color::Cyan)))
            .collect::<Vec<_>>()
            .join(", ");
        frame.line(format!("Since starting this node {uptime} ago:"));

        match self.registry.transactions_validated.get() {
            0 => frame.line(format!(
                "- {}",
                self.paint("You have validated no transactions.", Color::Yellow)
            )),
            1 => frame.line("- You have validated a transaction!"),
            count => frame.line(format!(
                "- You have validated {} transactions!",
                self.paint(count, Color::Cyan)
            )),
        }

        if self.config.mining && loaded {
            frame.line(format!(
                "- You have completed {} Equihash solver runs.",
                self.paint(self.registry.solver_runs.get(), Color::Cyan)
            ));

            let params = self.node.chain_params();
            let report = self
                .node
                .with_active_chain(|chain| self.registry.ledger.reconcile(chain, &params.consensus));
            if report.mined > 0 {
                let units = params.currency_units;
                frame.line(format!(
                    "- {}",
                    self.paint(format!("You have mined {} blocks!", report.mined), Color::Green)
                ));
                frame.line(format!(
                    "  Orphaned: {} blocks, Immature: {} {units}, Mature: {} {units}",
                    self.paint(report.orphaned, Color::Red),
                    self.paint(format_money(report.immature), Color::Yellow),
                    self.paint(format_money(report.mature), Color::Green),
                ));
            }
        }
        frame.blank();
    }

    fn message_section(&self, frame: &mut Frame, cols: usize) {
        let messages = self.registry.messages.snapshot();
        if messages.is_empty() {
            return;
        }
        frame.line("Messages:");
        for entry in &messages {
            let plain = if entry.caption.is_empty() {
                entry.body.clone()
            } else {
                format!("{}: {}", entry.caption, entry.body)
            };
            let wrapped = format_paragraph(&plain, cols.saturating_sub(2), 2);
            let colored = match caption_color(entry.kind) {
                Some(color) if !entry.caption.is_empty() && wrapped.starts_with(&entry.caption) => {
                    let rest = &wrapped[entry.caption.len()..];
                    format!("{}{rest}", self.paint(&entry.caption, color))
                }
                _ => wrapped,
            };
            frame.line(format!("- {colored}"));
        }
        frame.blank();
    }

    fn init_message_section(&self, frame: &mut Frame, loaded: bool) {
        if loaded {
            return;
        }
        let message = self.registry.init_message();
        if message == DONE_LOADING {
            frame.line(format!("Init message: {}", self.paint(&message, Color::Green)));
            self.registry.mark_loaded();
        } else {
            frame.line(format!("Init message: {}", self.paint(&message, Color::Yellow)));
        }
        frame.blank();
    }

    fn terminal_width(&self) -> usize {
        if !self.config.tty {
            return DEFAULT_COLUMNS;
        }
        columns_for_size(terminal::size())
    }

    fn paint(&self, value: impl Display, color: Color) -> String {
        if self.config.ansi {
            style(value).with(color).to_string()
        } else {
            value.to_string()
        }
    }
}

fn caption_color(kind: MessageKind) -> Option<Color> {
    match kind {
        MessageKind::Error => Some(Color::Red),
        MessageKind::Warning => Some(Color::Yellow),
        MessageKind::Information => Some(Color::Cyan),
        MessageKind::Plain => None,
    }
}

/// Terminal width from a size query, or [`DEFAULT_COLUMNS`] when the query
/// fails or reports zero columns.
fn columns_for_size(size: io::Result<(u16, u16)>) -> usize {
    match size {
        Ok((cols, _)) if cols > 0 => usize::from(cols),
        _ => DEFAULT_COLUMNS,
    }
}

fn unix_time_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
