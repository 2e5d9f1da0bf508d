use super::diagnostics::{Diagnostics, MissingReference};
use crate::model::{
    Action, Email, Group, Partner, PartnerRef, PartnerRestrictions, PartnerType,
};
use crate::records::{
    EmailPartnerRecord, GroupActionPartnerRecord, GroupPartnerRecord, Records,
};
use ahash::AHashMap;
use itertools::Itertools;
use std::collections::BTreeMap;

/// Entities that can be limited to, or withheld from, specific partner companies.
pub trait Restricted {
    fn restrictions_mut(&mut self) -> &mut PartnerRestrictions;
}

impl Restricted for Group {
    fn restrictions_mut(&mut self) -> &mut PartnerRestrictions {
        &mut self.restrictions
    }
}

impl Restricted for Action {
    fn restrictions_mut(&mut self) -> &mut PartnerRestrictions {
        &mut self.restrictions
    }
}

impl Restricted for Email {
    fn restrictions_mut(&mut self) -> &mut PartnerRestrictions {
        &mut self.restrictions
    }
}

/// A restriction row: a partner, and whether it is required (`true`) or excluded.
pub trait RestrictionRow {
    /// `None` is a placeholder meaning "no restriction".
    fn partner_id(&self) -> Option<i64>;
    fn include(&self) -> bool;
}

impl RestrictionRow for EmailPartnerRecord {
    fn partner_id(&self) -> Option<i64> {
        self.partner_id
    }
    fn include(&self) -> bool {
        self.include
    }
}

impl RestrictionRow for GroupPartnerRecord {
    fn partner_id(&self) -> Option<i64> {
        Some(self.partner_id)
    }
    fn include(&self) -> bool {
        self.include
    }
}

impl RestrictionRow for GroupActionPartnerRecord {
    fn partner_id(&self) -> Option<i64> {
        Some(self.partner_id)
    }
    fn include(&self) -> bool {
        self.include
    }
}

/// Appends each row's partner to the entity's required or excluded list.
///
/// Placeholder rows are skipped, as are partners that do not exist (recorded in `diagnostics`).
pub fn attach<R: RestrictionRow>(
    entity: &mut impl Restricted,
    rows: &[R],
    partners: &AHashMap<i64, Partner>,
    diagnostics: &mut Diagnostics,
) {
    let restrictions = entity.restrictions_mut();
    for row in rows {
        let Some(partner_id) = row.partner_id() else {
            continue;
        };
        let Some(partner) = partners.get(&partner_id) else {
            diagnostics.record(MissingReference::Partner { partner_id });
            continue;
        };
        let partner = PartnerRef {
            id: partner.id,
            name: partner.name.clone(),
        };
        if row.include() {
            restrictions.required.push(partner);
        } else {
            restrictions.excluded.push(partner);
        }
    }
}

/// Builds every partner company with its partner types and auto-add relations.
pub fn build_partners(records: &Records, diagnostics: &mut Diagnostics) -> AHashMap<i64, Partner> {
    let partner_type = |id: i64, diagnostics: &mut Diagnostics| match records.partner_types.get(&id) {
        Some(t) => Some(PartnerType {
            id: t.id,
            name: t.name.clone(),
        }),
        None => {
            diagnostics.record(MissingReference::PartnerType { partner_type_id: id });
            None
        }
    };

    let mut partners = AHashMap::new();
    for record in records.partners.values().sorted_by_key(|p| p.id) {
        let types = records
            .partner_type_rels
            .get(&record.id)
            .into_iter()
            .flatten()
            .filter_map(|rel| partner_type(rel.type_id, diagnostics))
            .collect();

        let mut auto_adds: BTreeMap<i64, Vec<(PartnerRef, PartnerType)>> = BTreeMap::new();
        for rel in records.partner_auto_adds.get(&record.id).into_iter().flatten() {
            let Some(added) = records.partners.get(&rel.auto_add_id) else {
                diagnostics.record(MissingReference::Partner {
                    partner_id: rel.auto_add_id,
                });
                continue;
            };
            let (Some(_), Some(added_as)) = (
                partner_type(rel.type_id, diagnostics),
                partner_type(rel.auto_add_type_id, diagnostics),
            ) else {
                continue;
            };
            auto_adds.entry(rel.type_id).or_default().push((
                PartnerRef {
                    id: added.id,
                    name: added.name.clone(),
                },
                added_as,
            ));
        }

        partners.insert(
            record.id,
            Partner {
                id: record.id,
                name: record.name.clone(),
                types,
                auto_adds,
            },
        );
    }
    partners
}
