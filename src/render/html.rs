use std::fmt::Write;

use crate::invoice::{InvoiceSnapshot, LineItem};

/// Page chrome shared by every invoice
const STYLE: &str = r#"
  @page { size: A4; margin: 15mm; }
  @media print {
    body { background: white; color: black; font-family: "Times New Roman", Times, serif; }
    thead th { -webkit-print-color-adjust: exact !important; print-color-adjust: exact !important; }
  }
  body { font-family: Helvetica, Arial, sans-serif; color: #111827; padding: 24px; margin: 0; }
  p { margin: 4px 0; }
  a { color: #3b82f6; text-decoration: underline; }
  .center { text-align: center; }
  .end { text-align: right; }
  .block { font-size: 14px; margin-bottom: 16px; }
  .school-name { font-weight: bold; font-size: 14px; }
  .logo { width: 160px; height: 160px; display: block; margin: 0 auto 8px; }
  .signature { width: 128px; height: auto; margin-bottom: 8px; }
  table { width: 100%; border-collapse: collapse; border: 1px solid black; font-size: 14px; }
  th, td { border: 1px solid black; padding: 4px 8px; }
  thead { background: #a4c1e2; color: black; }
  tfoot tr { background: #f9fafb; font-weight: 600; }
  .label { font-weight: 600; }
  .remark { color: #ef4444; }
  .slogan { text-align: center; font-size: 12px; color: black; margin-top: 24px; }
"#;

/// Escape text for use in HTML content and quoted attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

fn money(symbol: &str, value: f64) -> String {
    format!("{}{:.2}", escape_html(symbol), value)
}

fn item_row(body: &mut String, index: usize, item: &LineItem, symbol: &str) {
    // writing into a String cannot fail
    let _ = write!(
        body,
        r#"
      <tr>
        <td class="center">{}</td>
        <td>{}</td>
        <td class="center">{}</td>
        <td class="end">{}</td>
      </tr>"#,
        index + 1,
        escape_html(&item.description),
        item.discount,
        money(symbol, item.amount),
    );
}

/// Render the invoice as a standalone HTML document
pub fn render(snapshot: &InvoiceSnapshot) -> String {
    let school = &snapshot.school;
    let student = &snapshot.student;
    let placeholder = snapshot.placeholder.as_str();

    let mut rows = String::new();
    for (index, item) in snapshot.items.iter().enumerate() {
        item_row(&mut rows, index, item, &snapshot.currency_symbol);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<title>Invoice - {school_name}</title>
<style>{style}</style>
</head>
<body>
  <div class="center">
    <img src="{logo_url}" alt="{school_name} Logo" class="logo" />
  </div>

  <div class="block end">
    <p><strong>Invoice Date:</strong> {date}</p>
  </div>

  <div class="block">
    <p class="school-name">{school_name}</p>
    <p>Phone: {school_phone}</p>
    <p>Telegram: <a href="{telegram_url}" target="_blank" rel="noopener noreferrer">{telegram}</a></p>
    <p>Email: <a href="mailto:{school_email}">{school_email}</a></p>
    <p>Website: <a href="{website_url}" target="_blank" rel="noopener noreferrer">{website}</a></p>
  </div>

  <div class="block">
    <p><strong>Student Information</strong></p>
    <p>Student Name: {student_name}</p>
    <p>Email: {student_email}</p>
    <p>Phone: {student_phone}</p>
  </div>

  <table>
    <thead>
      <tr>
        <th style="text-align: left">No</th>
        <th class="center">Description</th>
        <th class="center">Discount (%)</th>
        <th class="center">Amount ({currency})</th>
      </tr>
    </thead>
    <tbody>{rows}
    </tbody>
    <tfoot>
      <tr>
        <td colspan="3" class="end">Total Amount ({currency})</td>
        <td class="end">{total}</td>
      </tr>
    </tfoot>
  </table>

  <div class="block" style="margin-top: 16px">
    <p class="label">Remark:</p>
    <p class="remark">{remark}</p>
  </div>

  <div class="block">
    <p class="label">Signature:</p>
    <img src="{signature_url}" alt="Signature" class="signature" />
  </div>

  <p class="slogan">{slogan}</p>
</body>
</html>
"#,
        style = STYLE,
        school_name = escape_html(&school.name),
        logo_url = escape_html(&school.logo_url),
        date = escape_html(&snapshot.date),
        school_phone = escape_html(&school.phone),
        telegram_url = escape_html(&school.telegram_url),
        telegram = escape_html(&school.telegram),
        school_email = escape_html(&school.email),
        website_url = escape_html(&school.website_url),
        website = escape_html(&school.website),
        student_name = escape_html(student.name().unwrap_or(placeholder)),
        student_email = escape_html(student.email().unwrap_or(placeholder)),
        student_phone = escape_html(student.phone().unwrap_or(placeholder)),
        rows = rows,
        currency = escape_html(&snapshot.currency_code),
        total = money(&snapshot.currency_symbol, snapshot.total),
        remark = escape_html(&snapshot.remark),
        signature_url = escape_html(&school.signature_url),
        slogan = escape_html(&school.slogan),
    )
}
