use kaeru::RewriteResultVerbose;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &str, res: &RewriteResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    println!(
        "\n{}",
        palette.bold(palette.paint(format!("⚙  Rewriting: \"{}\"", preview(input)), ansi::CYAN))
    );

    println!("\n{}", palette.paint("━━━ Output ━━━", ansi::GRAY));
    println!("  {}", palette.bold(palette.paint(&res.output, ansi::GREEN)));

    println!("\n{}", palette.paint("━━━ Calls ━━━", ansi::GRAY));
    if res.calls.is_empty() {
        println!("{}", palette.dim("  No calls emitted"));
    } else {
        for (idx, call) in res.calls.iter().enumerate() {
            let args = call
                .args
                .iter()
                .map(|a| format!("\"{a}\""))
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "  {} {}{}{}{}",
                palette.paint(format!("[{idx}]"), ansi::GRAY),
                palette.paint(&call.name, ansi::CYAN),
                palette.dim("("),
                palette.paint(args, ansi::YELLOW),
                palette.dim(")"),
            );
        }
    }

    println!("\n{}", palette.paint("━━━ Rules ━━━", ansi::GRAY));
    for stats in &res.details.rules {
        println!(
            "  {} {}  {} {}",
            if stats.matches > 0 {
                palette.paint(format!("✓ {}", stats.matches), ansi::GREEN)
            } else {
                palette.dim(format!("✗ {}", stats.matches))
            },
            palette.paint(&stats.source, ansi::BLUE),
            palette.dim("tried:"),
            palette.paint(stats.attempts.to_string(), ansi::YELLOW),
        );
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Positions: {}  │  Replaced: {}  │  Copied: {}",
        palette.paint(format!("{:?}", res.details.total), ansi::GREEN),
        palette.paint(res.details.positions.to_string(), ansi::CYAN),
        palette.paint(res.details.matched.to_string(), ansi::CYAN),
        palette.dim(res.details.copied.to_string()),
    );
    println!();
}

fn preview(input: &str) -> String {
    let flat = input.replace('\n', "⏎");
    if flat.chars().count() <= 60 {
        flat
    } else {
        let head: String = flat.chars().take(60).collect();
        format!("{head}…")
    }
}
