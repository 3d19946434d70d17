//! In-process stand-in for the menu tool, used by the workflow tests.

use crate::driver::protocol::APPLY_CHANGES_LABEL;
use crate::driver::request::{needs_destination, PortType};
use crate::menu::REJECTED_CHOICE_MARKER;
use crate::pattern::Pattern;
use crate::result::{ExpectError, MatchResult};
use crate::session::Transport;
use std::time::Duration;

const MAX_PORT: u32 = 7;

const MAIN_MENU: &[(&str, &str)] = &[
    ("1", "Configure Host Port"),
    ("2", "Configure SOC Port"),
    ("3", "Mapping"),
    ("4", "Save Configuration to file"),
    ("5", APPLY_CHANGES_LABEL),
    ("6", "Exit/Quit"),
];

const PORT_MENU: &[(&str, &str)] = &[
    ("1", "Modify MTU"),
    ("2", "Enable/Disable IMT Status"),
    ("b", "Back/Previous Menu"),
];

const MAPPING_MENU: &[(&str, &str)] = &[
    ("1", "Port  Mapping(Host PF to SOC  PF)"),
    ("2", "Port  Mapping(SOC  PF to Host PF)"),
    ("3", "Port  Mapping(SOC  PF to Line)"),
    ("b", "Back/Previous Menu"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Main,
    PortNumber(PortType),
    PortMenu(PortType, u32),
    MtuEntry(PortType, u32),
    ImtConfirm(u32),
    MappingMenu,
    MappingSource(String),
    MappingDestination(String, u32),
    SaveConfirm,
    Exited,
}

/// Menu tool that answers synchronously; output that is not there when a
/// pattern is awaited never arrives, so a missing prompt is a timeout.
pub struct SimulatedTool {
    output: String,
    state: State,
    hidden: Vec<String>,
    reject_mtu: bool,
    sends: Vec<String>,
    mtus: Vec<(PortType, u32, u32)>,
    imt_toggles: Vec<u32>,
    mappings: Vec<(String, u32, Option<u32>)>,
    saves: usize,
    applies: usize,
}

impl SimulatedTool {
    /// Tool sitting at its main menu.
    pub fn new() -> Self {
        let mut tool = Self::with_output(String::new(), State::Main);
        tool.output.push_str("Pytool management configuration\r\n");
        tool.show_main();
        tool
    }

    /// Tool that dies during startup after printing `output`.
    pub fn crashing(output: &str) -> Self {
        Self::with_output(output.to_string(), State::Exited)
    }

    /// Tool that prints `output` and then nothing more.
    pub fn hanging(output: &str) -> Self {
        Self::with_output(output.to_string(), State::Main)
    }

    fn with_output(output: String, state: State) -> Self {
        Self {
            output,
            state,
            hidden: Vec::new(),
            reject_mtu: false,
            sends: Vec::new(),
            mtus: Vec::new(),
            imt_toggles: Vec::new(),
            mappings: Vec::new(),
            saves: 0,
            applies: 0,
        }
    }

    /// Leave `label` out of every menu printed from now on.
    pub fn hide_label(mut self, label: &str) -> Self {
        self.hidden.push(label.to_string());
        self.output = String::from("Pytool management configuration\r\n");
        self.show_main();
        self
    }

    /// Reject every MTU value.
    pub fn reject_mtu(mut self) -> Self {
        self.reject_mtu = true;
        self
    }

    pub fn sends(&self) -> &[String] {
        &self.sends
    }

    pub fn mtus(&self) -> &[(PortType, u32, u32)] {
        &self.mtus
    }

    pub fn imt_toggles(&self) -> &[u32] {
        &self.imt_toggles
    }

    pub fn mappings(&self) -> &[(String, u32, Option<u32>)] {
        &self.mappings
    }

    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn applies(&self) -> usize {
        self.applies
    }

    pub fn exited(&self) -> bool {
        self.state == State::Exited
    }

    fn render(&mut self, items: &[(&str, &str)]) {
        for (selector, label) in items {
            if !self.hidden.iter().any(|h| h == label) {
                self.output.push_str(&format!("{}) {}\r\n", selector, label));
            }
        }
    }

    fn lookup(&self, items: &[(&str, &'static str)], line: &str) -> Option<&'static str> {
        items
            .iter()
            .find(|(selector, label)| *selector == line && !self.hidden.iter().any(|h| h == label))
            .map(|(_, label)| *label)
    }

    fn show_main(&mut self) {
        self.output.push_str("\r\n");
        self.render(MAIN_MENU);
        self.output.push_str("==> ");
    }

    fn show_port_menu(&mut self, port_type: PortType, port: u32) {
        self.output.push_str(&format!("\r\n{} Port {}\r\n", port_type, port));
        self.render(PORT_MENU);
        self.output.push_str("Main Menu\r\n==> ");
    }

    fn show_mapping_menu(&mut self) {
        self.output.push_str("\r\n");
        self.render(MAPPING_MENU);
        self.output.push_str("==> ");
    }

    fn ask_port_number(&mut self, port_type: PortType) {
        self.output.push_str(&format!(
            "Enable and Configure {} Port from range 0-{} (or \"b\" to Back/Previous Menu) :",
            port_type, MAX_PORT
        ));
    }

    fn ask_mapping_port(&mut self, port_type: PortType) {
        self.output.push_str(&format!(
            "Enter {} Port from range 0-{} (or \"b\" to Back/Previous Menu) :",
            port_type, MAX_PORT
        ));
    }

    fn reject(&mut self) {
        self.output.push_str(REJECTED_CHOICE_MARKER);
        self.output.push_str("\r\n");
    }

    fn port(line: &str) -> Option<u32> {
        line.parse().ok().filter(|p| *p <= MAX_PORT)
    }

    fn handle(&mut self, line: &str) {
        match self.state.clone() {
            State::Main => match self.lookup(MAIN_MENU, line) {
                Some("Configure Host Port") => self.enter_port_number(PortType::Host),
                Some("Configure SOC Port") => self.enter_port_number(PortType::Soc),
                Some("Mapping") => {
                    self.state = State::MappingMenu;
                    self.show_mapping_menu();
                }
                Some("Save Configuration to file") => {
                    self.saves += 1;
                    self.output.push_str("Configuration saved\r\n");
                    self.show_main();
                }
                Some(APPLY_CHANGES_LABEL) => {
                    self.applies += 1;
                    self.output.push_str("Changes applied\r\n");
                    self.show_main();
                }
                Some("Exit/Quit") => {
                    self.state = State::SaveConfirm;
                    self.output.push_str("Save latest Configuration? (y/n/b) ");
                }
                _ => {
                    self.reject();
                    self.show_main();
                }
            },
            State::PortNumber(port_type) => match line {
                "b" => {
                    self.state = State::Main;
                    self.show_main();
                }
                _ => match Self::port(line) {
                    Some(port) => {
                        self.state = State::PortMenu(port_type, port);
                        self.show_port_menu(port_type, port);
                    }
                    None => {
                        self.reject();
                        self.ask_port_number(port_type);
                    }
                },
            },
            State::PortMenu(port_type, port) => match self.lookup(PORT_MENU, line) {
                Some("Modify MTU") => {
                    self.state = State::MtuEntry(port_type, port);
                    self.output
                        .push_str("Enter the mtu (or \"b\" to Back/Previous Menu) :");
                }
                Some("Enable/Disable IMT Status") => {
                    self.state = State::ImtConfirm(port);
                    self.output.push_str("Do you want to toggle? (y/n/b)");
                }
                Some("Back/Previous Menu") => self.enter_port_number(port_type),
                _ => {
                    self.reject();
                    self.show_port_menu(port_type, port);
                }
            },
            State::MtuEntry(port_type, port) => {
                self.state = State::PortMenu(port_type, port);
                match line.parse() {
                    Ok(mtu) if !self.reject_mtu => {
                        self.mtus.push((port_type, port, mtu));
                        self.output.push_str(&format!("\r\nMTU set to {}\r\n", mtu));
                    }
                    _ => self.reject(),
                }
                self.show_port_menu(port_type, port);
            }
            State::ImtConfirm(port) => {
                self.state = State::PortMenu(PortType::Soc, port);
                if line == "y" {
                    self.imt_toggles.push(port);
                    self.output.push_str("\r\nIMT status toggled\r\n");
                }
                self.show_port_menu(PortType::Soc, port);
            }
            State::MappingMenu => match self.lookup(MAPPING_MENU, line) {
                Some("Back/Previous Menu") => {
                    self.state = State::Main;
                    self.show_main();
                }
                Some(label) => {
                    let kind = label
                        .trim_start_matches("Port  Mapping(")
                        .trim_end_matches(')')
                        .to_string();
                    let source_type = if kind.starts_with("Host") {
                        PortType::Host
                    } else {
                        PortType::Soc
                    };
                    self.state = State::MappingSource(kind);
                    self.ask_mapping_port(source_type);
                }
                None => {
                    self.reject();
                    self.show_mapping_menu();
                }
            },
            State::MappingSource(kind) => match Self::port(line) {
                Some(source) if needs_destination(&kind) => {
                    let destination_type = if kind.ends_with("Host PF") {
                        PortType::Host
                    } else {
                        PortType::Soc
                    };
                    self.state = State::MappingDestination(kind, source);
                    self.ask_mapping_port(destination_type);
                }
                Some(source) => {
                    self.mappings.push((kind, source, None));
                    self.state = State::MappingMenu;
                    self.output.push_str("\r\nMapping updated\r\n");
                    self.show_mapping_menu();
                }
                None => {
                    self.state = State::MappingMenu;
                    self.reject();
                    self.show_mapping_menu();
                }
            },
            State::MappingDestination(kind, source) => {
                self.state = State::MappingMenu;
                match Self::port(line) {
                    Some(destination) => {
                        self.mappings.push((kind, source, Some(destination)));
                        self.output.push_str("\r\nMapping updated\r\n");
                    }
                    None => self.reject(),
                }
                self.show_mapping_menu();
            }
            State::SaveConfirm => {
                self.state = State::Exited;
                self.output.push_str("\r\nGoodbye\r\n");
            }
            State::Exited => {}
        }
    }

    fn enter_port_number(&mut self, port_type: PortType) {
        self.state = State::PortNumber(port_type);
        self.ask_port_number(port_type);
    }
}

impl Transport for SimulatedTool {
    async fn send_line(&mut self, line: &str) -> Result<(), ExpectError> {
        if self.exited() {
            return Err(ExpectError::IoError(std::io::Error::from(
                std::io::ErrorKind::BrokenPipe,
            )));
        }
        self.sends.push(line.to_string());
        self.handle(line);
        Ok(())
    }

    async fn await_pattern(&mut self, pattern: Pattern) -> Result<MatchResult, ExpectError> {
        let matcher = pattern.to_matcher()?;
        match matcher.find(self.output.as_bytes()) {
            Some(m) => {
                let before = self.output[..m.start].to_string();
                let matched = self.output[m.start..m.end].to_string();
                self.output.drain(..m.end);
                Ok(MatchResult {
                    matched,
                    before,
                    captures: m.captures,
                })
            }
            None if self.exited() => Err(ExpectError::Eof {
                before: std::mem::take(&mut self.output),
            }),
            None => Err(ExpectError::Timeout {
                duration: Duration::ZERO,
                before: self.output.clone(),
            }),
        }
    }
}
