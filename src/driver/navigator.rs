//! Selecting a menu option by label

use crate::driver::error::DriverError;
use crate::driver::protocol::Label;
use crate::menu::Menu;
use crate::session::Transport;

/// Send the selector for `label` from `menu`.
///
/// A missing label is never guessed at: the lookup fails with
/// [`DriverError::LabelNotFound`] and nothing is sent. The caller awaits the
/// prompt that follows, since it differs from step to step.
pub async fn select<T: Transport>(
    transport: &mut T,
    menu: &Menu,
    label: Label<'_>,
) -> Result<(), DriverError> {
    let text = label.text();
    let selector = menu
        .selector(&text)
        .ok_or_else(|| DriverError::LabelNotFound {
            label: text.to_string(),
        })?;

    log::debug!("selecting {} with {:?}", label, selector);
    transport.send_line(selector).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::request::PortType;
    use crate::driver::sim::SimulatedTool;

    #[tokio::test]
    async fn test_select_sends_selector_verbatim() {
        let mut tool = SimulatedTool::new();
        let menu = Menu::parse("1) Configure Host Port\n2) Configure SOC Port\nb) Back/Previous Menu\n");

        select(&mut tool, &menu, Label::ConfigurePort(PortType::Host))
            .await
            .unwrap();

        assert_eq!(tool.sends(), ["1"]);
    }

    #[tokio::test]
    async fn test_select_back_shortcut() {
        let mut tool = SimulatedTool::new();
        let menu = Menu::parse("1) Configure Host Port\nb) Back/Previous Menu\n");

        select(&mut tool, &menu, Label::BackPrevious).await.unwrap();

        assert_eq!(tool.sends(), ["b"]);
    }

    #[tokio::test]
    async fn test_select_on_empty_menu_fails_without_sending() {
        let mut tool = SimulatedTool::new();
        let menu = Menu::parse("no options here");

        let err = select(&mut tool, &menu, Label::ModifyMtu).await.unwrap_err();

        assert!(matches!(err, DriverError::LabelNotFound { ref label } if label == "Modify MTU"));
        assert!(tool.sends().is_empty());
    }
}
