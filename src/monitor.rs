//! htop-style terminal view of the backend status.
//!
//! The meters and process list are static scenery; only the `pseudocc` row
//! and the two banners follow the polled [`StatusSnapshot`].

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

use crate::models::StatusSnapshot;

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const CPU_METER: Color = Color::Green;
    const MEM_METER: Color = Color::Blue;
    const SWAP_METER: Color = Color::Cyan;
    const WORKLOAD_BIASED: Color = Color::Red;
    const WORKLOAD_FAIR: Color = Color::Cyan;
    const GOOD: Color = Color::Green;
    const BAD: Color = Color::Red;
    const WARN: Color = Color::Yellow;
}

const METERS: [(&str, Color); 4] = [
    ("1  [||||||||||||||||||||||||||||||||||||||| 98.2%]", Colors::CPU_METER),
    ("2  [||||                                     8.1%]", Colors::CPU_METER),
    ("Mem[|||||||||||||||||||||||||||||| 11.8G/27.1G]", Colors::MEM_METER),
    ("Swp[|                              79.7M/95.0G]", Colors::SWAP_METER),
];

const SUMMARY: [&str; 3] = [
    "Tasks: 276, 272 kthr; 1 running",
    "Load average: 1.45 0.85 0.42",
    "Uptime: 05:42:12",
];

pub const TABLE_HEADER: &str =
    " PID USER      PRI  NI  SCORE  VIRT   RES   SHR S  CPU% MEM%   TIME+  Command         ";

/// Name of the simulated workload in the process list
pub const WORKLOAD_PROCESS: &str = "pseudocc";

/// One line of the process list
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRow {
    pub pid: u32,
    pub user: &'static str,
    pub priority: i32,
    pub nice: i32,
    pub score: u32,
    pub cpu_percent: f32,
    pub mem_percent: f32,
    pub command: &'static str,
}

impl ProcessRow {
    const fn idle(pid: u32, user: &'static str, cpu: f32, mem: f32, command: &'static str) -> Self {
        Self {
            pid,
            user,
            priority: 20,
            nice: 0,
            score: 0,
            cpu_percent: cpu,
            mem_percent: mem,
            command,
        }
    }

    pub fn format(&self) -> String {
        format!(
            "{:<5} {:<8} {:>3} {:>3} {:>5}   250M  120M  60M S  {:>4.1}  {:>3.1}  0:42.12 {}",
            self.pid,
            self.user,
            self.priority,
            self.nice,
            self.score,
            self.cpu_percent,
            self.mem_percent,
            self.command
        )
    }
}

const BACKGROUND_PROCESSES: [ProcessRow; 4] = [
    ProcessRow::idle(1087, "root", 0.5, 1.2, "systemd"),
    ProcessRow::idle(3241, "user", 1.2, 4.5, "gnome-shell"),
    ProcessRow::idle(5521, "user", 0.8, 2.1, "Xorg"),
    ProcessRow::idle(7712, "user", 0.2, 0.5, "bash"),
];

/// Process list for `status`, workload first when one is running.
///
/// Under bias the workload is shown deprioritized (PRI 39, NI 19) with a
/// high burst score; under fair scheduling it runs at default priority and
/// takes nearly a whole core.
pub fn process_rows(status: &StatusSnapshot) -> Vec<ProcessRow> {
    let mut rows = Vec::with_capacity(BACKGROUND_PROCESSES.len() + 1);
    if status.is_stressing {
        let biased = status.bore_enabled;
        rows.push(ProcessRow {
            pid: 9924,
            user: "user",
            priority: if biased { 39 } else { 20 },
            nice: if biased { 19 } else { 0 },
            score: if biased { 15 } else { 2 },
            cpu_percent: if biased { 88.2 } else { 99.1 },
            mem_percent: 0.8,
            command: WORKLOAD_PROCESS,
        });
    }
    rows.extend(BACKGROUND_PROCESSES.iter().cloned());
    rows
}

/// Banner tone, mapped to a color when drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Bad,
    Warn,
}

impl Tone {
    fn color(self) -> Color {
        match self {
            Tone::Good => Colors::GOOD,
            Tone::Bad => Colors::BAD,
            Tone::Warn => Colors::WARN,
        }
    }
}

/// Scheduler and load banners shown under the table
pub fn banners(status: &StatusSnapshot) -> [(&'static str, Tone); 2] {
    let engine = if status.bore_enabled {
        ("BORE ENGINE: ACTIVE (Priority Bias: High)", Tone::Good)
    } else {
        ("BORE ENGINE: DISABLED (Standard CFS Fairness)", Tone::Bad)
    };
    let load = if status.is_stressing {
        ("KERNEL LOAD: CRITICAL (pseudocc active)", Tone::Warn)
    } else {
        ("KERNEL LOAD: IDLE", Tone::Good)
    };
    [engine, load]
}

/// Plain-text rendering of the whole screen
pub fn render_process_table(status: &StatusSnapshot) -> String {
    let mut out = String::new();
    for (meter, _) in METERS {
        out.push_str(meter);
        out.push('\n');
    }
    out.push('\n');
    for line in SUMMARY {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(TABLE_HEADER);
    out.push('\n');
    for row in process_rows(status) {
        out.push_str(&row.format());
        out.push('\n');
    }
    out.push('\n');
    for (banner, _) in banners(status) {
        out.push_str(banner);
        out.push('\n');
    }
    out
}

/// Clear `out` and draw the colored screen for `status`.
pub fn draw<W: Write>(out: &mut W, status: &StatusSnapshot) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    for (meter, color) in METERS {
        queue!(out, SetForegroundColor(color), Print(meter), ResetColor, Print("\r\n"))?;
    }
    queue!(out, Print("\r\n"))?;
    for line in SUMMARY {
        queue!(out, Print(line), Print("\r\n"))?;
    }
    queue!(
        out,
        Print("\r\n"),
        SetAttribute(Attribute::Bold),
        SetAttribute(Attribute::Reverse),
        Print(TABLE_HEADER),
        SetAttribute(Attribute::Reset),
        Print("\r\n")
    )?;

    for row in process_rows(status) {
        if row.command == WORKLOAD_PROCESS {
            let color = if status.bore_enabled {
                Colors::WORKLOAD_BIASED
            } else {
                Colors::WORKLOAD_FAIR
            };
            queue!(
                out,
                SetForegroundColor(color),
                SetAttribute(Attribute::Bold),
                Print(row.format()),
                SetAttribute(Attribute::Reset),
                ResetColor,
                Print("\r\n")
            )?;
        } else {
            queue!(out, Print(row.format()), Print("\r\n"))?;
        }
    }

    queue!(out, Print("\r\n"))?;
    for (banner, tone) in banners(status) {
        queue!(
            out,
            SetForegroundColor(tone.color()),
            SetAttribute(Attribute::Bold),
            Print(banner),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print("\r\n")
        )?;
    }
    out.flush()
}
