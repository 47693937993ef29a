//! Restoration option flags and the instruction sent to the model.

use serde::{Deserialize, Serialize};

const PREAMBLE: &str = "High quality photo restoration.";
const CLOSING: &str = "Maintain the original composition and facial features accurately. Output a high-resolution restored image.";

/// One of the three independent restoration toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestorationOption {
    FixDamage,
    EnhanceDetails,
    Colorize,
}

impl RestorationOption {
    /// All options in the order their tasks appear in the instruction.
    pub const ALL: [RestorationOption; 3] = [
        RestorationOption::FixDamage,
        RestorationOption::EnhanceDetails,
        RestorationOption::Colorize,
    ];

    /// Task phrase inserted into the instruction when the option is enabled.
    pub fn task(self) -> &'static str {
        match self {
            RestorationOption::FixDamage => "remove scratches, creases, dust spots, and tears",
            RestorationOption::EnhanceDetails => {
                "sharpen details, denoise, and improve clarity significantly"
            }
            RestorationOption::Colorize => "colorize this image naturally and realistically",
        }
    }
}

/// Which restoration operations the user asked for. Defaults to all enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestorationOptions {
    #[serde(default = "enabled")]
    pub fix_damage: bool,
    #[serde(default = "enabled")]
    pub enhance_details: bool,
    #[serde(default = "enabled")]
    pub colorize: bool,
}

const fn enabled() -> bool {
    true
}

impl Default for RestorationOptions {
    fn default() -> Self {
        Self {
            fix_damage: true,
            enhance_details: true,
            colorize: true,
        }
    }
}

impl RestorationOptions {
    /// Every flag off.
    pub const NONE: RestorationOptions = RestorationOptions {
        fix_damage: false,
        enhance_details: false,
        colorize: false,
    };

    pub fn is_enabled(&self, option: RestorationOption) -> bool {
        match option {
            RestorationOption::FixDamage => self.fix_damage,
            RestorationOption::EnhanceDetails => self.enhance_details,
            RestorationOption::Colorize => self.colorize,
        }
    }

    pub fn set(&mut self, option: RestorationOption, value: bool) {
        let flag = self.flag_mut(option);
        *flag = value;
    }

    /// Flip a single flag, leaving the others untouched.
    pub fn toggle(&mut self, option: RestorationOption) {
        let flag = self.flag_mut(option);
        *flag = !*flag;
    }

    /// Enabled options in instruction order.
    pub fn requested(&self) -> impl Iterator<Item = RestorationOption> + '_ {
        RestorationOption::ALL
            .into_iter()
            .filter(|option| self.is_enabled(*option))
    }

    pub fn any_requested(&self) -> bool {
        self.requested().next().is_some()
    }

    fn flag_mut(&mut self, option: RestorationOption) -> &mut bool {
        match option {
            RestorationOption::FixDamage => &mut self.fix_damage,
            RestorationOption::EnhanceDetails => &mut self.enhance_details,
            RestorationOption::Colorize => &mut self.colorize,
        }
    }
}

/// Build the natural-language instruction for the requested operations.
pub fn build_instruction(options: &RestorationOptions) -> String {
    let mut instruction = String::from(PREAMBLE);

    if options.any_requested() {
        let tasks: Vec<&str> = options.requested().map(RestorationOption::task).collect();
        instruction.push_str(" Please ");
        instruction.push_str(&tasks.join(", "));
        instruction.push('.');
    }

    instruction.push(' ');
    instruction.push_str(CLOSING);
    instruction
}
