use crate::domain::payment::string_or_number;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order summary submitted by the front-end once an order has been placed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderEmailRequest {
    pub customer_email: String,
    pub customer_name: String,
    pub plan_name: String,
    pub price: Decimal,
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
}

/// A rendered message in the shape the email provider accepts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Provider acknowledgement of an accepted message.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EmailReceipt {
    pub id: String,
}

impl OrderEmailRequest {
    pub fn subject(&self) -> String {
        format!("Potvrzení objednávky #{}", self.order_id)
    }

    pub fn render(&self, from: &str) -> OutgoingEmail {
        let name = escape_html(&self.customer_name);
        let plan = escape_html(&self.plan_name);
        let order_id = escape_html(&self.order_id);
        let price = format_price(self.price);

        let html = format!(
            r##"<!DOCTYPE html>
<html lang="cs">
  <body style="font-family: Arial, sans-serif; color: #1f2937; background: #f9fafb; padding: 24px;">
    <div style="max-width: 560px; margin: 0 auto; background: #ffffff; border-radius: 8px; padding: 32px;">
      <h1 style="font-size: 22px; margin-top: 0;">Děkujeme za Vaši objednávku, {name}!</h1>
      <p>Vaši objednávku jsme přijali a po připsání platby ji začneme zpracovávat.</p>
      <table style="width: 100%; border-collapse: collapse; margin: 24px 0;">
        <tr>
          <td style="padding: 8px 0; color: #6b7280;">Číslo objednávky</td>
          <td style="padding: 8px 0; text-align: right;"><strong>#{order_id}</strong></td>
        </tr>
        <tr>
          <td style="padding: 8px 0; color: #6b7280;">Tarif</td>
          <td style="padding: 8px 0; text-align: right;">{plan}</td>
        </tr>
        <tr>
          <td style="padding: 8px 0; color: #6b7280;">Cena</td>
          <td style="padding: 8px 0; text-align: right;">{price} Kč</td>
        </tr>
      </table>
      <p>Pokud máte jakékoli dotazy, stačí odpovědět na tento e-mail.</p>
      <p style="color: #6b7280; font-size: 12px;">Tento e-mail byl odeslán automaticky.</p>
    </div>
  </body>
</html>
"##
        );

        OutgoingEmail {
            from: from.to_string(),
            to: vec![self.customer_email.clone()],
            subject: self.subject(),
            html,
        }
    }
}

/// Czech notation: decimal comma, trailing zeros dropped.
fn format_price(price: Decimal) -> String {
    price.normalize().to_string().replace('.', ",")
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
