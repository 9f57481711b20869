// src/models/data.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// Escopo da exclusão em massa
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum DeletionScope {
    /// A marca inteira, incluindo a própria linha em `brands`.
    Brand { brand_id: Uuid },
    Orders { brand_id: Option<Uuid> },
    Invoices { brand_id: Option<Uuid> },
    Support { brand_id: Option<Uuid> },
    Promotions { brand_id: Option<Uuid> },
    Everything,
}

impl DeletionScope {
    /// Filtro de marca (None = todas as marcas).
    pub fn brand_filter(&self) -> Option<Uuid> {
        match *self {
            DeletionScope::Brand { brand_id } => Some(brand_id),
            DeletionScope::Orders { brand_id }
            | DeletionScope::Invoices { brand_id }
            | DeletionScope::Support { brand_id }
            | DeletionScope::Promotions { brand_id } => brand_id,
            DeletionScope::Everything => None,
        }
    }

    /// Passos em ordem: filhos antes dos pais.
    pub fn plan(&self) -> Vec<DeletionStep> {
        use DeletionStep::*;

        match self {
            DeletionScope::Brand { .. } | DeletionScope::Everything => vec![
                Messages,
                Channels,
                InvoiceItems,
                Invoices,
                UnlinkInvoiceOrders,
                OrderLines,
                Orders,
                Promotions,
                Products,
                UnlinkProfiles,
                Brands,
            ],
            // Faturas podem apontar para o pedido; desvincula antes de apagar
            DeletionScope::Orders { .. } => vec![UnlinkInvoiceOrders, OrderLines, Orders],
            DeletionScope::Invoices { .. } => vec![InvoiceItems, Invoices],
            DeletionScope::Support { .. } => vec![Messages, Channels],
            DeletionScope::Promotions { .. } => vec![Promotions],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeletionStep {
    Messages,
    Channels,
    InvoiceItems,
    Invoices,
    UnlinkInvoiceOrders,
    OrderLines,
    Orders,
    Promotions,
    Products,
    UnlinkProfiles,
    Brands,
}

impl DeletionStep {
    /// Tabela afetada (para logs e relatório).
    pub fn table(&self) -> &'static str {
        match self {
            DeletionStep::Messages => "support_messages",
            DeletionStep::Channels => "support_channels",
            DeletionStep::InvoiceItems => "invoice_items",
            DeletionStep::Invoices => "invoices",
            DeletionStep::UnlinkInvoiceOrders => "invoices.order_id",
            DeletionStep::OrderLines => "po_items",
            DeletionStep::Orders => "purchase_orders",
            DeletionStep::Promotions => "promotions",
            DeletionStep::Products => "products",
            DeletionStep::UnlinkProfiles => "profiles.brand_id",
            DeletionStep::Brands => "brands",
        }
    }

    /// SQL do passo. `$1` é o filtro de marca (NULL = todas).
    pub fn sql(&self) -> &'static str {
        match self {
            DeletionStep::Messages => {
                "DELETE FROM support_messages m USING support_channels c \
                 WHERE m.channel_id = c.id AND ($1::uuid IS NULL OR c.brand_id = $1)"
            }
            DeletionStep::Channels => {
                "DELETE FROM support_channels WHERE $1::uuid IS NULL OR brand_id = $1"
            }
            DeletionStep::InvoiceItems => {
                "DELETE FROM invoice_items ii USING invoices i \
                 WHERE ii.invoice_id = i.id AND ($1::uuid IS NULL OR i.brand_id = $1)"
            }
            DeletionStep::Invoices => "DELETE FROM invoices WHERE $1::uuid IS NULL OR brand_id = $1",
            DeletionStep::UnlinkInvoiceOrders => {
                "UPDATE invoices SET order_id = NULL, updated_at = NOW() \
                 WHERE order_id IN (SELECT id FROM purchase_orders WHERE $1::uuid IS NULL OR brand_id = $1)"
            }
            DeletionStep::OrderLines => {
                "DELETE FROM po_items pi USING purchase_orders o \
                 WHERE pi.order_id = o.id AND ($1::uuid IS NULL OR o.brand_id = $1)"
            }
            DeletionStep::Orders => {
                "DELETE FROM purchase_orders WHERE $1::uuid IS NULL OR brand_id = $1"
            }
            DeletionStep::Promotions => {
                "DELETE FROM promotions WHERE $1::uuid IS NULL OR brand_id = $1"
            }
            DeletionStep::Products => "DELETE FROM products WHERE $1::uuid IS NULL OR brand_id = $1",
            DeletionStep::UnlinkProfiles => {
                "UPDATE profiles SET brand_id = NULL \
                 WHERE brand_id IS NOT NULL AND ($1::uuid IS NULL OR brand_id = $1)"
            }
            DeletionStep::Brands => "DELETE FROM brands WHERE $1::uuid IS NULL OR id = $1",
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub step: DeletionStep,
    pub table: &'static str,
    pub affected: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReport {
    pub steps: Vec<StepReport>,
    pub total_affected: u64,
}

impl DeletionReport {
    pub fn new(steps: Vec<StepReport>) -> Self {
        let total_affected = steps.iter().map(|s| s.affected).sum();
        Self { steps, total_affected }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(plan: &[DeletionStep], step: DeletionStep) -> usize {
        plan.iter().position(|s| *s == step).unwrap()
    }

    #[test]
    fn brand_plan_deletes_children_before_parents() {
        let plan = DeletionScope::Brand { brand_id: Uuid::new_v4() }.plan();

        let pairs = [
            (DeletionStep::Messages, DeletionStep::Channels),
            (DeletionStep::InvoiceItems, DeletionStep::Invoices),
            (DeletionStep::Invoices, DeletionStep::Orders),
            (DeletionStep::UnlinkInvoiceOrders, DeletionStep::Orders),
            (DeletionStep::OrderLines, DeletionStep::Orders),
            (DeletionStep::Orders, DeletionStep::Brands),
            (DeletionStep::Products, DeletionStep::Brands),
            (DeletionStep::Promotions, DeletionStep::Brands),
            (DeletionStep::Channels, DeletionStep::Brands),
            (DeletionStep::UnlinkProfiles, DeletionStep::Brands),
        ];

        for (child, parent) in pairs {
            assert!(
                position(&plan, child) < position(&plan, parent),
                "{:?} deve vir antes de {:?}",
                child,
                parent
            );
        }
    }

    #[test]
    fn order_plan_unlinks_invoices_first() {
        let plan = DeletionScope::Orders { brand_id: None }.plan();
        assert_eq!(
            plan,
            vec![DeletionStep::UnlinkInvoiceOrders, DeletionStep::OrderLines, DeletionStep::Orders]
        );
    }

    #[test]
    fn unlinking_follows_the_order_brand_not_the_invoice_brand() {
        let sql = DeletionStep::UnlinkInvoiceOrders.sql();
        assert!(sql.contains("SELECT id FROM purchase_orders"));
        assert!(!sql.contains("AND ($1::uuid IS NULL OR brand_id = $1)"));
    }

    #[test]
    fn scope_parses_from_tagged_json() {
        let id = Uuid::new_v4();
        let scope: DeletionScope =
            serde_json::from_value(serde_json::json!({ "scope": "brand", "brand_id": id })).unwrap();
        assert_eq!(scope, DeletionScope::Brand { brand_id: id });
        assert_eq!(scope.brand_filter(), Some(id));

        let scope: DeletionScope =
            serde_json::from_value(serde_json::json!({ "scope": "everything" })).unwrap();
        assert_eq!(scope.brand_filter(), None);
    }

    #[test]
    fn every_step_filters_by_brand_parameter() {
        let plan = DeletionScope::Everything.plan();
        assert!(plan.iter().all(|s| s.sql().contains("$1")));
    }

    #[test]
    fn report_sums_affected_rows() {
        let report = DeletionReport::new(vec![
            StepReport { step: DeletionStep::Products, table: "products", affected: 3 },
            StepReport { step: DeletionStep::Brands, table: "brands", affected: 1 },
        ]);
        assert_eq!(report.total_affected, 4);
    }
}
