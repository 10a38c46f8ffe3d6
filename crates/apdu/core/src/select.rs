//! SELECT-by-AID exchange engine
//!
//! [`select_application`] sends one SELECT, interprets the status word and,
//! when the card announces more data with `61 XX`, fetches it with a single
//! GET RESPONSE. Every outcome comes back as a [`SelectResult`]; nothing in
//! here returns `Err`, because probing a catalog of candidate AIDs is
//! mostly a sequence of expected rejections.

use bytes::{Bytes, BytesMut};
use tracing::{Level, debug, event, instrument, warn};

use crate::command::Command;
use crate::response::Response;
use crate::response::status::{StatusClass, StatusWord};
use crate::transport::{CardTransport, TransportError};

/// How a single SELECT attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKind {
    /// The card accepted the SELECT
    Selected,
    /// The card answered and refused: this AID is not there
    Rejected,
    /// The card never answered: no card, reader fault, broken channel
    TransportFailed,
}

/// Result of one SELECT attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectResult {
    /// Whether the application was selected
    pub success: bool,
    /// FCI or other data returned by the card, GET RESPONSE data appended
    pub response_data: Bytes,
    /// Status word of the SELECT itself; `None` when the card never answered
    pub status: Option<StatusWord>,
    /// Transport error text, set only when the card never answered
    pub error_detail: Option<String>,
}

impl SelectResult {
    /// The application was selected
    pub const fn selected(response_data: Bytes, status: StatusWord) -> Self {
        Self {
            success: true,
            response_data,
            status: Some(status),
            error_detail: None,
        }
    }

    /// The card refused the SELECT
    pub const fn rejected(status: StatusWord) -> Self {
        Self {
            success: false,
            response_data: Bytes::new(),
            status: Some(status),
            error_detail: None,
        }
    }

    /// The exchange never completed
    pub fn transport_failed(error: &TransportError) -> Self {
        Self {
            success: false,
            response_data: Bytes::new(),
            status: None,
            error_detail: Some(error.to_string()),
        }
    }

    /// Which of the three outcomes this is
    pub const fn kind(&self) -> SelectKind {
        if self.success {
            SelectKind::Selected
        } else if self.status.is_some() {
            SelectKind::Rejected
        } else {
            SelectKind::TransportFailed
        }
    }

    /// Check whether the card answered with a refusal
    pub const fn is_rejected(&self) -> bool {
        matches!(self.kind(), SelectKind::Rejected)
    }

    /// Check whether the card never answered
    pub const fn is_transport_failure(&self) -> bool {
        matches!(self.kind(), SelectKind::TransportFailed)
    }

    /// Status word as compact hex (`6A82`), or the transport error text
    pub fn status_text(&self) -> String {
        match (&self.status, &self.error_detail) {
            (Some(status), _) => status.to_hex(),
            (None, Some(detail)) => detail.clone(),
            (None, None) => "no answer".to_string(),
        }
    }
}

/// Select an application by AID
///
/// The AID is sent as is; lengths outside 1 to 16 bytes are the caller's
/// problem. The transport is used for at most two exchanges, one after the
/// other.
#[instrument(level = "debug", skip_all, fields(aid = %hex::encode_upper(aid)))]
pub fn select_application<T>(transport: &mut T, aid: &[u8]) -> SelectResult
where
    T: CardTransport + ?Sized,
{
    let command = Command::select_by_aid(aid);

    let response = match exchange(transport, &command) {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, "SELECT did not reach the card");
            return SelectResult::transport_failed(&e);
        }
    };

    let status = response.status();
    log_status(status);

    match status.classify() {
        StatusClass::Success => SelectResult::selected(response.into_payload(), status),
        StatusClass::MoreData(available) => {
            let data = fetch_remaining(transport, response.into_payload(), available);
            SelectResult::selected(data, status)
        }
        StatusClass::Rejected => SelectResult::rejected(status),
    }
}

/// Issue the one GET RESPONSE a `61 XX` calls for
///
/// The SELECT already succeeded, so a failed follow-up only costs the extra
/// bytes: the original data is returned unchanged.
fn fetch_remaining<T>(transport: &mut T, initial: Bytes, available: u8) -> Bytes
where
    T: CardTransport + ?Sized,
{
    match exchange(transport, &Command::get_response(available)) {
        Ok(follow_up) if follow_up.status().sw1 == 0x90 => {
            let mut data = BytesMut::with_capacity(initial.len() + follow_up.payload().len());
            data.extend_from_slice(&initial);
            data.extend_from_slice(follow_up.payload());
            data.freeze()
        }
        Ok(follow_up) => {
            warn!(status = %follow_up.status(), "GET RESPONSE refused, keeping SELECT data");
            initial
        }
        Err(e) => {
            warn!(error = %e, "GET RESPONSE failed, keeping SELECT data");
            initial
        }
    }
}

fn exchange<T>(transport: &mut T, command: &Command) -> Result<Response, TransportError>
where
    T: CardTransport + ?Sized,
{
    let raw = transport.transmit_raw(&command.to_bytes())?;
    Response::from_bytes(&raw).map_err(|e| TransportError::MalformedResponse(e.received_len()))
}

fn log_status(status: StatusWord) {
    macro_rules! log_at {
        ($level:expr) => {
            event!(
                $level,
                status = %status,
                description = status.description(),
                "SELECT answered"
            )
        };
    }

    let level = status.tracing_level();
    if level == Level::WARN {
        log_at!(Level::WARN);
    } else if level == Level::INFO {
        log_at!(Level::INFO);
    } else {
        log_at!(Level::DEBUG);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use hex_literal::hex;

    fn ok(bytes: &[u8]) -> Result<Bytes, TransportError> {
        Ok(Bytes::copy_from_slice(bytes))
    }

    #[test]
    fn test_select_sends_exact_apdu() {
        let mut transport = MockTransport::with_success();
        select_application(&mut transport, &hex!("A0 00 00 00 03 10 10"));

        assert_eq!(transport.commands.len(), 1);
        assert_eq!(
            transport.commands[0].as_ref(),
            &hex!("00 A4 04 00 07 A0 00 00 00 03 10 10 00")
        );
    }

    #[test]
    fn test_success_returns_data() {
        let mut transport = MockTransport::with_response(&hex!("6F 07 84 05 A0 00 00 00 03 90 00"));
        let result = select_application(&mut transport, &hex!("A0 00 00 00 03"));

        assert!(result.success);
        assert_eq!(result.kind(), SelectKind::Selected);
        assert_eq!(result.response_data.as_ref(), &hex!("6F 07 84 05 A0 00 00 00 03"));
        assert_eq!(result.status, Some(StatusWord::new(0x90, 0x00)));
        assert_eq!(result.error_detail, None);
    }

    #[test]
    fn test_success_without_data_sends_no_follow_up() {
        let mut transport = MockTransport::with_success();
        let result = select_application(&mut transport, &hex!("D2 76 00 00 85 01 01"));

        assert!(result.success);
        assert!(result.response_data.is_empty());
        assert_eq!(transport.commands.len(), 1);
    }

    #[test]
    fn test_more_data_issues_one_get_response() {
        for n in 0..=u8::MAX {
            let mut transport = MockTransport::new(vec![ok(&[0x61, n]), ok(&[0x90, 0x00])]);
            let result = select_application(&mut transport, &hex!("A0 00 00 00 04 10 10"));

            assert!(result.success);
            assert_eq!(transport.commands.len(), 2);
            assert_eq!(transport.commands[1].as_ref(), &[0x00, 0xC0, 0x00, 0x00, n]);
        }
    }

    #[test]
    fn test_more_data_concatenates_in_order() {
        let mut transport = MockTransport::new(vec![
            ok(&hex!("6F 03 61 05")),
            ok(&hex!("84 01 02 03 04 90 00")),
        ]);
        let result = select_application(&mut transport, &hex!("A0 00 00 00 04 10 10"));

        assert!(result.success);
        assert_eq!(result.response_data.as_ref(), &hex!("6F 03 84 01 02 03 04"));
        assert_eq!(result.status, Some(StatusWord::new(0x61, 0x05)));
    }

    #[test]
    fn test_follow_up_transport_failure_keeps_success() {
        let mut transport = MockTransport::new(vec![
            ok(&hex!("61 05")),
            Err(TransportError::CardRemoved),
        ]);
        let result = select_application(&mut transport, &hex!("F0 01 02 03 04 05 06"));

        assert!(result.success);
        assert!(result.response_data.is_empty());
        assert_eq!(result.error_detail, None);
        assert_eq!(transport.commands.len(), 2);
    }

    #[test]
    fn test_follow_up_transport_failure_keeps_original_data() {
        let mut transport = MockTransport::new(vec![
            ok(&hex!("AA BB 61 05")),
            Err(TransportError::CardRemoved),
        ]);
        let result = select_application(&mut transport, &hex!("F0 01 02 03 04 05 06"));

        assert!(result.success);
        assert_eq!(result.kind(), SelectKind::Selected);
        assert_eq!(result.response_data.as_ref(), &hex!("AA BB"));
        assert_eq!(result.status, Some(StatusWord::new(0x61, 0x05)));
        assert_eq!(transport.commands[1].as_ref(), &hex!("00 C0 00 00 05"));
    }

    #[test]
    fn test_follow_up_refusal_keeps_original_data() {
        let mut transport = MockTransport::new(vec![ok(&hex!("AA BB 61 05")), ok(&hex!("6A 82"))]);
        let result = select_application(&mut transport, &hex!("F0 01 02 03 04 05 06"));

        assert!(result.success);
        assert_eq!(result.response_data.as_ref(), &hex!("AA BB"));
    }

    #[test]
    fn test_follow_up_is_never_chained() {
        let mut transport = MockTransport::new(vec![
            ok(&hex!("61 05")),
            ok(&hex!("01 02 61 03")),
            ok(&hex!("03 04 05 90 00")),
        ]);
        let result = select_application(&mut transport, &hex!("F0 01 02 03 04 05 06"));

        assert!(result.success);
        assert!(result.response_data.is_empty());
        assert_eq!(transport.commands.len(), 2);
    }

    #[test]
    fn test_rejections() {
        for sw in [
            hex!("6A 82"),
            hex!("6A 86"),
            hex!("69 99"),
            hex!("6E 00"),
            hex!("69 85"),
            hex!("90 01"),
        ] {
            let mut transport = MockTransport::with_response(&sw);
            let result = select_application(&mut transport, &hex!("A0 00 00 00 03 10 10"));

            assert!(!result.success);
            assert!(result.is_rejected());
            assert!(result.response_data.is_empty());
            assert_eq!(result.status, Some(StatusWord::new(sw[0], sw[1])));
            assert_eq!(transport.commands.len(), 1, "no retry after a rejection");
        }
    }

    #[test]
    fn test_rejection_drops_payload() {
        let mut transport = MockTransport::with_response(&hex!("01 02 6A 82"));
        let result = select_application(&mut transport, &hex!("A0 00 00 00 03 10 10"));

        assert!(result.is_rejected());
        assert!(result.response_data.is_empty());
    }

    #[test]
    fn test_short_aid_file_not_found() {
        let mut transport = MockTransport::with_response(&hex!("6A 82"));
        let result = select_application(&mut transport, &hex!("F0 01 02 03"));

        assert!(!result.success);
        assert_eq!(result.status, Some(StatusWord::new(0x6A, 0x82)));
        assert_eq!(result.status_text(), "6A82");
        assert_eq!(transport.commands[0].as_ref(), &hex!("00 A4 04 00 04 F0 01 02 03 00"));
    }

    #[test]
    fn test_transport_failure_is_distinct() {
        let mut transport = MockTransport::with_error(TransportError::NoCard);
        let result = select_application(&mut transport, &hex!("A0 00 00 00 03 10 10"));

        assert!(!result.success);
        assert!(result.is_transport_failure());
        assert!(!result.is_rejected());
        assert_eq!(result.status, None);
        assert_eq!(result.error_detail.as_deref(), Some("No card present"));
        assert_eq!(result.status_text(), "No card present");
    }

    #[test]
    fn test_malformed_response_is_transport_failure() {
        let mut transport = MockTransport::with_response(&[0x90]);
        let result = select_application(&mut transport, &hex!("A0 00 00 00 03 10 10"));

        assert_eq!(result.kind(), SelectKind::TransportFailed);
        assert_eq!(
            result.error_detail.as_deref(),
            Some("Malformed response: 1 bytes, expected at least 2")
        );
    }

    #[test]
    fn test_works_through_trait_object() {
        let mut transport = MockTransport::with_success();
        let dynamic: &mut dyn CardTransport = &mut transport;
        assert!(select_application(dynamic, &hex!("A0 00 00 00 03")).success);
    }
}
