//! Fixed traversals of the tool's menu tree

use crate::driver::error::DriverError;
use crate::driver::navigator;
use crate::driver::protocol::{Label, Prompt, BACK, CONFIRM};
use crate::driver::request::{needs_destination, PortConfigRequest, PortMappingRequest, PortType};
use crate::driver::{PytoolDriver, WorkflowOutcome};
use crate::menu::Menu;
use crate::result::MatchResult;
use crate::session::Transport;

/// Walks one workflow: tracks the latest capture and the tool's rejections.
struct Steps<'t, T> {
    transport: &'t mut T,
    screen: String,
    rejected: usize,
}

impl<'t, T: Transport> Steps<'t, T> {
    fn new(transport: &'t mut T, screen: &str) -> Self {
        Self {
            transport,
            screen: screen.to_string(),
            rejected: 0,
        }
    }

    fn menu(&self) -> Menu {
        Menu::parse(&self.screen)
    }

    /// Select `label` from the menu in the latest capture.
    async fn select(&mut self, label: Label<'_>) -> Result<(), DriverError> {
        let menu = self.menu();
        navigator::select(&mut *self.transport, &menu, label).await
    }

    /// Select `label` from a menu parsed earlier at the same menu level.
    async fn select_in(&mut self, menu: &Menu, label: Label<'_>) -> Result<(), DriverError> {
        navigator::select(&mut *self.transport, menu, label).await
    }

    async fn send(&mut self, line: &str) -> Result<(), DriverError> {
        self.transport.send_line(line).await?;
        Ok(())
    }

    async fn wait(&mut self, prompt: Prompt) -> Result<MatchResult, DriverError> {
        let result = self
            .transport
            .await_pattern(prompt.pattern())
            .await
            .map_err(|e| DriverError::awaiting(prompt, e))?;

        if Menu::parse(&result.before).rejected_choice() {
            self.rejected += 1;
        }
        self.screen.clone_from(&result.before);
        Ok(result)
    }

    /// Enter the submenu of `port`.
    async fn configure_port(&mut self, port_type: PortType, port: u32) -> Result<(), DriverError> {
        self.select(Label::ConfigurePort(port_type)).await?;
        let prompt = self.wait(Prompt::PortNumber).await?;
        if let Some(max) = prompt.captures.get(1) {
            log::debug!("{} ports range 0-{}", port_type, max);
        }
        self.send(&port.to_string()).await?;
        self.wait(Prompt::TopLevel).await?;
        Ok(())
    }

    /// Leave a port submenu and the port-number prompt behind it.
    async fn leave_port(&mut self) -> Result<(), DriverError> {
        self.select(Label::BackPrevious).await?;
        self.wait(Prompt::PortNumber).await?;
        self.send(BACK).await?;
        self.wait(Prompt::TopLevel).await?;
        Ok(())
    }

    async fn set_mtu(&mut self, request: &PortConfigRequest, port: u32, mtu: u32) -> Result<(), DriverError> {
        log::info!("setting MTU {} on {} port {}", mtu, request.port_type, port);
        self.configure_port(request.port_type, port).await?;

        self.select(Label::ModifyMtu).await?;
        self.wait(Prompt::MtuEntry).await?;
        self.send(&mtu.to_string()).await?;
        self.wait(Prompt::MainMenu).await?;

        if request.toggles_imt() {
            log::info!("toggling IMT on SOC port {}", port);
            self.select(Label::ImtStatus).await?;
            self.wait(Prompt::ImtToggle).await?;
            self.send(CONFIRM).await?;
            self.wait(Prompt::MainMenuTopLevel).await?;
        }

        self.leave_port().await
    }

    async fn map_ports(&mut self, request: &PortMappingRequest) -> Result<(), DriverError> {
        // The tool only offers mapping once a port submenu has been visited.
        self.configure_port(PortType::Host, 1).await?;
        self.leave_port().await?;

        self.select(Label::Mapping).await?;
        self.wait(Prompt::TopLevel).await?;
        let mapping_menu = self.menu();

        for (kind, source, destination) in request.iter() {
            log::info!("mapping {} port {} -> {:?}", kind, source, destination);
            self.select_in(&mapping_menu, Label::PortMapping(kind)).await?;
            self.wait(Prompt::MappingPort).await?;
            self.send(&source.to_string()).await?;
            // Missing destinations were rejected before the walk started.
            if let Some(destination) = destination.filter(|_| needs_destination(kind)) {
                self.wait(Prompt::MappingPort).await?;
                self.send(&destination.to_string()).await?;
            }
            self.wait(Prompt::TopLevel).await?;
        }

        self.select(Label::BackPrevious).await?;
        self.wait(Prompt::TopLevel).await?;
        Ok(())
    }

    async fn save_and_apply(&mut self) -> Result<(), DriverError> {
        self.select(Label::SaveConfiguration).await?;
        self.wait(Prompt::TopLevel).await?;
        self.select(Label::ApplyChanges).await?;
        self.wait(Prompt::TopLevel).await?;
        log::info!("configuration saved and applied");
        Ok(())
    }

    async fn quit(&mut self) -> Result<(), DriverError> {
        self.select(Label::ExitQuit).await?;
        self.wait(Prompt::SaveConfirm).await?;
        self.send(CONFIRM).await?;
        self.wait(Prompt::Goodbye).await?;
        log::info!("tool session closed");
        Ok(())
    }

    /// Fold the walk's result into an outcome; only lookup failures are kept
    /// as a failed outcome, everything else aborts the driver.
    fn finish(self, result: Result<(), DriverError>) -> Result<WorkflowOutcome, DriverError> {
        let failure = match result {
            Ok(()) => None,
            Err(e) if e.is_lookup_failure() => {
                log::error!("workflow aborted: {}", e);
                Some(e)
            }
            Err(e) => return Err(e),
        };

        Ok(WorkflowOutcome {
            success: failure.is_none(),
            captured: self.screen,
            failure,
            rejected_choices: self.rejected,
        })
    }
}

impl<T: Transport> PytoolDriver<T> {
    /// Select a menu option by label without waiting for the response.
    pub async fn select(&mut self, menu: &Menu, label: Label<'_>) -> Result<(), DriverError> {
        navigator::select(&mut self.transport, menu, label).await
    }

    /// Open the submenu of one host or SOC port.
    ///
    /// `captured` holds the port submenu text on success.
    pub async fn configure_host_or_soc_port(
        &mut self,
        screen: &str,
        port_type: PortType,
        port: u32,
    ) -> Result<WorkflowOutcome, DriverError> {
        let mut steps = Steps::new(&mut self.transport, screen);
        let result = steps.configure_port(port_type, port).await;
        steps.finish(result)
    }

    /// Set the MTU of every port in `request`, then save and apply.
    ///
    /// Ports are visited in request order, each with a full enter/modify/leave
    /// traversal. SOC ports additionally get their IMT status toggled when the
    /// request asks for it. With `quit`, the tool is exited afterwards.
    pub async fn configure_mtu_size(
        &mut self,
        screen: &str,
        request: &PortConfigRequest,
        quit: bool,
    ) -> Result<WorkflowOutcome, DriverError> {
        let mut steps = Steps::new(&mut self.transport, screen);
        let result = async {
            for (&port, &mtu) in &request.ports {
                steps.set_mtu(request, port, mtu).await?;
            }
            steps.save_and_apply().await?;
            if quit {
                steps.quit().await?;
            }
            Ok::<(), DriverError>(())
        }
        .await;
        steps.finish(result)
    }

    /// Program port mappings, then save and apply.
    ///
    /// The request is checked up front: a mapping type that needs a
    /// destination but has none is rejected before anything is sent.
    pub async fn port_mapping(
        &mut self,
        screen: &str,
        request: &PortMappingRequest,
        quit: bool,
    ) -> Result<WorkflowOutcome, DriverError> {
        if let Some((kind, source)) = request.missing_destinations().into_iter().next() {
            return Err(DriverError::InvalidRequest(format!(
                "{} port {} has no destination",
                kind, source
            )));
        }

        let mut steps = Steps::new(&mut self.transport, screen);
        let result = async {
            steps.map_ports(request).await?;
            steps.save_and_apply().await?;
            if quit {
                steps.quit().await?;
            }
            Ok::<(), DriverError>(())
        }
        .await;
        steps.finish(result)
    }

    /// Save the configuration to file and apply it.
    pub async fn save_and_apply(&mut self, screen: &str) -> Result<WorkflowOutcome, DriverError> {
        let mut steps = Steps::new(&mut self.transport, screen);
        let result = steps.save_and_apply().await;
        steps.finish(result)
    }

    /// Exit the tool, confirming the save prompt.
    pub async fn quit(&mut self, screen: &str) -> Result<WorkflowOutcome, DriverError> {
        let mut steps = Steps::new(&mut self.transport, screen);
        let result = steps.quit().await;
        steps.finish(result)
    }
}
