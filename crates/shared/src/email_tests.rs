use super::*;
use crate::config::EmailConfig;

fn test_config() -> EmailConfig {
    EmailConfig {
        smtp_host: "localhost".to_string(),
        smtp_port: 1025,
        smtp_username: "user".to_string(),
        smtp_password: "password".to_string(),
        from_email: "noreply@example.com".to_string(),
        from_name: "Bazaar".to_string(),
    }
}

fn accepted() -> DeliveryInfo {
    DeliveryInfo {
        accepted: vec!["test@example.com".to_string()],
        response: "250 Message accepted".to_string(),
    }
}

#[tokio::test]
async fn test_send_email_text_only() {
    let mut transport = MockMailTransport::new();
    transport
        .expect_send_mail()
        .withf(|m: &MailMessage| {
            m.to == "test@example.com"
                && m.subject == "Test Subject"
                && m.text == "Hello World"
                && m.from == "Bazaar <noreply@example.com>"
                && m.html.is_none()
        })
        .times(1)
        .returning(|_| Ok(accepted()));

    let mailer = Mailer::new(Arc::new(transport), &test_config());
    let info = mailer
        .send_email(SendEmailRequest::new(
            "test@example.com",
            "Test Subject",
            "Hello World",
        ))
        .await
        .unwrap();

    assert_eq!(info, accepted());
}

#[tokio::test]
async fn test_send_email_with_html() {
    let mut transport = MockMailTransport::new();
    transport
        .expect_send_mail()
        .withf(|m: &MailMessage| m.html.as_deref() == Some("<p>Hello</p>") && m.text == "Plain text")
        .times(1)
        .returning(|_| Ok(accepted()));

    let mailer = Mailer::new(Arc::new(transport), &test_config());
    let result = mailer
        .send_email(
            SendEmailRequest::new("test@example.com", "Test HTML", "Plain text")
                .with_html("<p>Hello</p>"),
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_empty_html_is_omitted() {
    let mut transport = MockMailTransport::new();
    transport
        .expect_send_mail()
        .withf(|m: &MailMessage| m.html.is_none())
        .times(1)
        .returning(|_| Ok(accepted()));

    let mailer = Mailer::new(Arc::new(transport), &test_config());
    let result = mailer
        .send_email(SendEmailRequest::new("test@example.com", "Subject", "Body").with_html(""))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_missing_fields_fail_before_transport() {
    let requests = [
        SendEmailRequest {
            email: None,
            ..SendEmailRequest::new("", "Subject", "Body")
        },
        SendEmailRequest::new("test@example.com", "", "Body"),
        SendEmailRequest {
            message: None,
            ..SendEmailRequest::new("test@example.com", "Subject", "")
        },
    ];

    for request in requests {
        let mut transport = MockMailTransport::new();
        transport.expect_send_mail().never();
        let mailer = Mailer::new(Arc::new(transport), &test_config());

        let err = mailer.send_email(request).await.unwrap_err();
        assert!(matches!(err, AppError::MailInput(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.normalize().message,
            vec!["Email, subject, and message are required"]
        );
    }
}

#[tokio::test]
async fn test_transport_failure_maps_to_delivery_error() {
    let mut transport = MockMailTransport::new();
    transport
        .expect_send_mail()
        .times(1)
        .returning(|_| Err(TransportError::Send("connection refused".into())));

    let mailer = Mailer::new(Arc::new(transport), &test_config());
    let err = mailer
        .send_email(SendEmailRequest::new("test@example.com", "Subject", "Body"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MailDelivery(_)));
    let normalized = err.normalize();
    assert_eq!(normalized.status_code, 500);
    assert_eq!(normalized.message, vec!["Email could not be sent"]);
}

#[test]
fn test_mailer_sender_identity() {
    let mailer = Mailer::new(Arc::new(MockMailTransport::new()), &test_config());
    assert_eq!(mailer.sender(), "Bazaar <noreply@example.com>");
}

#[tokio::test]
async fn test_smtp_transport_from_config() {
    assert!(SmtpMailTransport::from_config(&test_config()).is_ok());

    let implicit = EmailConfig {
        smtp_port: 465,
        ..test_config()
    };
    assert!(SmtpMailTransport::from_config(&implicit).is_ok());
}

#[test]
fn test_build_message_rejects_bad_address() {
    let message = MailMessage {
        from: "Bazaar <noreply@example.com>".to_string(),
        to: "not an address".to_string(),
        subject: "Subject".to_string(),
        text: "Body".to_string(),
        html: None,
    };

    let result = SmtpMailTransport::build_message(&message);
    assert!(matches!(result, Err(TransportError::InvalidAddress(_))));
}

#[test]
fn test_build_message_with_html() {
    let message = MailMessage {
        from: "Bazaar <noreply@example.com>".to_string(),
        to: "test@example.com".to_string(),
        subject: "Subject".to_string(),
        text: "Body".to_string(),
        html: Some("<p>Body</p>".to_string()),
    };

    assert!(SmtpMailTransport::build_message(&message).is_ok());
}

#[test]
fn test_transport_error_display() {
    assert_eq!(
        format!("{}", TransportError::Build("msg".into())),
        "Failed to build email: msg"
    );
    assert_eq!(
        format!("{}", TransportError::Send("msg".into())),
        "Failed to send email: msg"
    );
    assert_eq!(
        format!("{}", TransportError::InvalidAddress("msg".into())),
        "Invalid email address: msg"
    );
}
