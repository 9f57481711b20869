// src/services/document_service.rs

use genpdf::{elements, style, Alignment, Element};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BrandRepository, InvoiceRepository},
    models::{
        brand::Brand,
        invoices::{Invoice, InvoiceItem},
        status::StatusBadge,
    },
};

const FONT_FAMILY: &str = "Roboto";
const ISSUER: &str = "BRAND PARTNER PORTAL";

#[derive(Clone)]
pub struct DocumentService {
    invoice_repo: InvoiceRepository,
    brand_repo: BrandRepository,
    fonts_dir: String,
}

impl DocumentService {
    pub fn new(invoice_repo: InvoiceRepository, brand_repo: BrandRepository, fonts_dir: String) -> Self {
        Self { invoice_repo, brand_repo, fonts_dir }
    }

    /// PDF da fatura. Com `brand_id`, faturas de outra marca viram 404.
    pub async fn generate_invoice_pdf(
        &self,
        conn: &mut PgConnection,
        invoice_id: Uuid,
        brand_id: Option<Uuid>,
    ) -> Result<(Invoice, Vec<u8>), AppError> {
        // 1. Busca os dados
        let invoice = self
            .invoice_repo
            .find_by_id(&mut *conn, invoice_id)
            .await?
            .filter(|i| brand_id.is_none_or(|b| b == i.brand_id))
            .ok_or_else(|| AppError::ResourceNotFound("invoice".to_string()))?;

        let items = self.invoice_repo.list_items(&mut *conn, invoice.id).await?;
        let brand = self
            .brand_repo
            .find_by_id(&mut *conn, invoice.brand_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("brand".to_string()))?;

        // 2. Renderiza fora do runtime (genpdf é síncrono)
        let fonts_dir = self.fonts_dir.clone();
        let render_invoice = invoice.clone();
        let bytes = tokio::task::spawn_blocking(move || render(&fonts_dir, &render_invoice, &items, &brand))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task do PDF: {}", e))??;

        Ok((invoice, bytes))
    }
}

fn render(fonts_dir: &str, invoice: &Invoice, items: &[InvoiceItem], brand: &Brand) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files(fonts_dir, FONT_FAMILY, None).map_err(|e| {
        AppError::DocumentError(format!("Fonte {} não encontrada em {}: {}", FONT_FAMILY, fonts_dir, e))
    })?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("Invoice #{}", invoice.invoice_number));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    // --- Cabeçalho ---
    doc.push(elements::Paragraph::new(ISSUER).styled(style::Style::new().bold().with_font_size(18)));
    doc.push(elements::Break::new(1.5));
    doc.push(
        elements::Paragraph::new(format!("INVOICE #{}", invoice.invoice_number))
            .styled(style::Style::new().bold().with_font_size(14)),
    );
    doc.push(elements::Paragraph::new(format!(
        "Issued: {}",
        invoice.created_at.format("%d/%m/%Y")
    )));
    doc.push(elements::Paragraph::new(format!("Due: {}", invoice.due_date.format("%d/%m/%Y"))));
    doc.push(elements::Paragraph::new(format!("Status: {}", invoice.status.label())));
    if let Some(paid) = invoice.paid_date {
        doc.push(elements::Paragraph::new(format!("Paid: {}", paid.format("%d/%m/%Y"))));
    }

    doc.push(elements::Break::new(1));
    doc.push(elements::Paragraph::new(format!("Bill to: {}", brand.legal_name)));
    if let Some(awrs) = &brand.awrs_number {
        doc.push(elements::Paragraph::new(format!("AWRS: {}", awrs)).styled(style::Style::new().with_font_size(10)));
    }
    doc.push(elements::Break::new(2));

    // --- Itens ---
    if !items.is_empty() {
        let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Description").styled(bold))
            .element(elements::Paragraph::new("Qty").styled(bold))
            .element(elements::Paragraph::new("Unit").styled(bold))
            .element(elements::Paragraph::new("Total").styled(bold))
            .push()
            .map_err(|e| AppError::DocumentError(e.to_string()))?;

        for item in items {
            table
                .row()
                .element(elements::Paragraph::new(item.description.clone()))
                .element(elements::Paragraph::new(item.quantity.to_string()))
                .element(elements::Paragraph::new(format!("£{:.2}", item.unit_price)))
                .element(elements::Paragraph::new(format!("£{:.2}", item.line_total)))
                .push()
                .map_err(|e| AppError::DocumentError(e.to_string()))?;
        }

        doc.push(table);
        doc.push(elements::Break::new(2));
    }

    // --- Total ---
    let mut total = elements::Paragraph::new(format!("AMOUNT DUE: £{:.2}", invoice.amount));
    total.set_alignment(Alignment::Right);
    doc.push(total.styled(style::Style::new().bold().with_font_size(12)));

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| AppError::DocumentError(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{brand::BrandStatus, invoices::InvoiceStatus};
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    #[test]
    fn missing_fonts_are_a_document_error() {
        let now = Utc::now();
        let invoice = Invoice {
            id: Uuid::new_v4(),
            brand_id: Uuid::new_v4(),
            order_id: None,
            invoice_number: 5000,
            amount: Decimal::from(100),
            due_date: NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
            paid_date: None,
            status: InvoiceStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let brand = Brand {
            id: invoice.brand_id,
            legal_name: "Example Gin Co. Ltd".into(),
            trading_name: None,
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            category: None,
            awrs_number: None,
            status: BrandStatus::Active,
            rejection_reason: None,
            pricing_terms: None,
            contract_reference: None,
            contract_signed_by: None,
            shipping_notes: None,
            submitted_at: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        };

        let result = render("/nonexistent/fonts", &invoice, &[], &brand);
        assert!(matches!(result, Err(AppError::DocumentError(_))));
    }
}
