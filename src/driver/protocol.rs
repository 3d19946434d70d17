//! Menu labels and prompts the workflows depend on
//!
//! The tool has no stable interface; this table is the whole of what the
//! driver assumes about its output.

use crate::driver::request::PortType;
use crate::pattern::Pattern;
use regex::bytes::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

/// Top-level prompt marker.
pub const TOP_LEVEL_MARKER: &str = "==>";

/// Apply label exactly as the tool prints it, color escapes included.
pub const APPLY_CHANGES_LABEL: &str = "\x1b[31mApply (Changes to be applied)\x1b[0m";

/// Reply to yes/no/back questions.
pub const CONFIRM: &str = "y";

/// Reply that backs out of a port-number prompt.
pub const BACK: &str = "b";

static PORT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"Enable and Configure (?:Host|SOC) Port from range 0-(\d+) \(or "b" to Back/Previous Menu\) :"#,
    )
    .expect("valid port number prompt")
});

static MAPPING_PORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Enter (?:Host|SOC) Port from range 0-(\d+) \(or "b" to Back/Previous Menu\) :"#)
        .expect("valid mapping port prompt")
});

static MAIN_MENU_TOP_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Main Menu\r?\n==>").expect("valid main menu prompt"));

/// Menu labels selected by the workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label<'a> {
    /// `Configure Host Port` / `Configure SOC Port`
    ConfigurePort(PortType),
    /// `Modify MTU`
    ModifyMtu,
    /// `Enable/Disable IMT Status`
    ImtStatus,
    /// `Back/Previous Menu`
    BackPrevious,
    /// `Mapping`
    Mapping,
    /// `Port  Mapping(<type>)`, spaced the way the tool prints it
    PortMapping(&'a str),
    /// `Save Configuration to file`
    SaveConfiguration,
    /// Red `Apply (Changes to be applied)`
    ApplyChanges,
    /// `Exit/Quit`
    ExitQuit,
}

impl Label<'_> {
    /// Exact label text as printed by the tool.
    pub fn text(&self) -> Cow<'static, str> {
        match self {
            Label::ConfigurePort(port_type) => Cow::Owned(format!("Configure {} Port", port_type)),
            Label::ModifyMtu => Cow::Borrowed("Modify MTU"),
            Label::ImtStatus => Cow::Borrowed("Enable/Disable IMT Status"),
            Label::BackPrevious => Cow::Borrowed("Back/Previous Menu"),
            Label::Mapping => Cow::Borrowed("Mapping"),
            Label::PortMapping(kind) => Cow::Owned(format!("Port  Mapping({})", kind)),
            Label::SaveConfiguration => Cow::Borrowed("Save Configuration to file"),
            Label::ApplyChanges => Cow::Borrowed(APPLY_CHANGES_LABEL),
            Label::ExitQuit => Cow::Borrowed("Exit/Quit"),
        }
    }
}

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.text())
    }
}

/// Synchronization points awaited after each send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// `==>`
    TopLevel,
    /// Port number for the port configuration submenu
    PortNumber,
    /// `Enter the mtu (or "b" to Back/Previous Menu) :`
    MtuEntry,
    /// `Main Menu`
    MainMenu,
    /// `Main Menu` followed by the top-level marker on the next line
    MainMenuTopLevel,
    /// `Do you want to toggle? (y/n/b)`
    ImtToggle,
    /// Source or destination port for a port mapping
    MappingPort,
    /// `Save latest Configuration? (y/n/b)`
    SaveConfirm,
    /// `Goodbye`
    Goodbye,
}

impl Prompt {
    /// Pattern to hand to the transport.
    pub fn pattern(self) -> Pattern {
        match self {
            Prompt::TopLevel => Pattern::exact(TOP_LEVEL_MARKER),
            Prompt::PortNumber => Pattern::Regex(PORT_NUMBER.clone()),
            Prompt::MtuEntry => Pattern::exact(r#"Enter the mtu (or "b" to Back/Previous Menu) :"#),
            Prompt::MainMenu => Pattern::exact("Main Menu"),
            Prompt::MainMenuTopLevel => Pattern::Regex(MAIN_MENU_TOP_LEVEL.clone()),
            Prompt::ImtToggle => Pattern::exact("Do you want to toggle? (y/n/b)"),
            Prompt::MappingPort => Pattern::Regex(MAPPING_PORT.clone()),
            Prompt::SaveConfirm => Pattern::exact("Save latest Configuration? (y/n/b)"),
            Prompt::Goodbye => Pattern::exact("Goodbye"),
        }
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Prompt::TopLevel => "top-level prompt",
            Prompt::PortNumber => "port number prompt",
            Prompt::MtuEntry => "MTU entry prompt",
            Prompt::MainMenu => "main menu footer",
            Prompt::MainMenuTopLevel => "main menu footer and prompt",
            Prompt::ImtToggle => "IMT toggle confirmation",
            Prompt::MappingPort => "mapping port prompt",
            Prompt::SaveConfirm => "save confirmation",
            Prompt::Goodbye => "goodbye banner",
        };
        f.write_str(name)
    }
}
