//! HTML bodies for the signup emails.
//!
//! Placeholders use the `{{name}}` form and are filled with escaped values.

use chrono::NaiveDateTime;

pub const CONFIRMATION_SUBJECT: &str = "Confirmacao de Inscricao na Newsletter";
pub const CONFIRMATION_TEXT: &str = "Obrigado por se inscrever na nossa newsletter!";
pub const NOTIFICATION_SUBJECT: &str = "Nova Inscricao na Newsletter";

const CONFIRMATION_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Inscrição Confirmada</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            background-color: #f4f4f4;
            margin: 0;
            padding: 0;
        }
        .container {
            max-width: 600px;
            margin: 40px auto;
            background-color: #ffffff;
            padding: 20px;
            border-radius: 8px;
            box-shadow: 0 0 10px rgba(0,0,0,0.1);
        }
        h1 {
            color: #333333;
        }
        p {
            font-size: 16px;
            color: #666666;
        }
        .button {
            display: inline-block;
            margin-top: 20px;
            padding: 10px 20px;
            background-color: #007BFF;
            color: white;
            text-decoration: none;
            border-radius: 5px;
        }
        .footer {
            margin-top: 30px;
            font-size: 12px;
            color: #aaaaaa;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>Bem-vindo à newsletter do {{site_name}}</h1>
        <p>Obrigado por se inscrever. Agora você receberá atualizações, novidades e conteúdos exclusivos diretamente no seu e-mail.</p>
        <a href="{{site_url}}" class="button">Visite nosso site</a>
        <div class="footer">
            <p>Se você não se inscreveu, ignore este e-mail.</p>
        </div>
    </div>
</body>
</html>
"#;

const NOTIFICATION_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Nova Inscrição na Newsletter</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            background-color: #f9f9f9;
            margin: 0;
            padding: 20px;
        }
        .container {
            background-color: #ffffff;
            padding: 20px;
            border-radius: 6px;
            border: 1px solid #dddddd;
            max-width: 600px;
            margin: auto;
        }
        h2 {
            color: #333333;
        }
        p {
            font-size: 16px;
            color: #555555;
            margin: 8px 0;
        }
        .label {
            font-weight: bold;
            color: #000;
        }
    </style>
</head>
<body>
    <div class="container">
        <h2>Nova Inscrição na Newsletter</h2>
        <p><span class="label">E-mail:</span> {{email}}</p>
        <p><span class="label">Data:</span> {{date}}</p>
        <p>Você recebeu esta notificação porque um novo usuário se inscreveu na newsletter do site.</p>
    </div>
</body>
</html>
"#;

pub fn confirmation_html(site_url: &str, site_name: &str) -> String {
    CONFIRMATION_HTML
        .replace("{{site_url}}", &htmlescape::encode_minimal(site_url))
        .replace("{{site_name}}", &htmlescape::encode_minimal(site_name))
}

pub fn notification_html(subscriber_email: &str, subscribed_at: &NaiveDateTime) -> String {
    NOTIFICATION_HTML
        .replace("{{email}}", &htmlescape::encode_minimal(subscriber_email))
        .replace("{{date}}", &format_timestamp(subscribed_at))
}

pub fn notification_text(subscriber_email: &str) -> String {
    format!("Nova inscrição na newsletter: {}", subscriber_email)
}

/// `DD/MM/YYYY HH:MM:SS`
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format("%d/%m/%Y %H:%M:%S").to_string()
}
