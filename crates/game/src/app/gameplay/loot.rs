static ITEM_CATALOG: [ItemTemplate; 8] = [
    ItemTemplate {
        slot: ItemSlot::Hat,
        name: "Wizard Hat",
        color: 0x6a1b9a,
        base: StatBonus::new(10, 2, 0),
    },
    ItemTemplate {
        slot: ItemSlot::Hat,
        name: "Baseball Cap",
        color: 0x1976d2,
        base: StatBonus::new(7, 1, 0),
    },
    ItemTemplate {
        slot: ItemSlot::Shirt,
        name: "Red Shirt",
        color: 0xd32f2f,
        base: StatBonus::new(12, 3, 0),
    },
    ItemTemplate {
        slot: ItemSlot::Shirt,
        name: "Green Tunic",
        color: 0x388e3c,
        base: StatBonus::new(10, 2, 1),
    },
    ItemTemplate {
        slot: ItemSlot::Pants,
        name: "Blue Jeans",
        color: 0x1976d2,
        base: StatBonus::new(8, 2, 0),
    },
    ItemTemplate {
        slot: ItemSlot::Pants,
        name: "Gold Pants",
        color: 0xffd600,
        base: StatBonus::new(13, 3, 0),
    },
    ItemTemplate {
        slot: ItemSlot::Weapon,
        name: "Golden Sword",
        color: 0xffd600,
        base: StatBonus::new(0, 0, 8),
    },
    ItemTemplate {
        slot: ItemSlot::Weapon,
        name: "Spiked Club",
        color: 0x6d4c41,
        base: StatBonus::new(0, 0, 12),
    },
];

impl StatBonus {
    /// Bonus after one more duplicate: health grows by a quarter rounded up,
    /// defense and attack by a fifth rounded down but never less than one.
    fn leveled(self) -> Self {
        Self {
            health: self.health.saturating_add(self.health.div_ceil(4)),
            defense: self.defense.saturating_add((self.defense / 5).max(1)),
            attack: self.attack.saturating_add((self.attack / 5).max(1)),
        }
    }
}

impl InventoryItem {
    fn from_template(template: &ItemTemplate) -> Self {
        Self {
            slot: template.slot,
            name: template.name,
            color: template.color,
            bonus: template.base,
            level: 1,
        }
    }

    fn stats_text(&self) -> String {
        format!(
            "Lv.{} (+{} HP, +{} DEF, +{} ATK)",
            self.level, self.bonus.health, self.bonus.defense, self.bonus.attack
        )
    }
}

/// Owned items in acquisition order. Entries are never removed, so an index
/// stays valid for the lifetime of the run.
#[derive(Debug, Default)]
struct Inventory {
    items: Vec<InventoryItem>,
}

impl Inventory {
    fn acquire(&mut self, template: &ItemTemplate) -> AcquireOutcome {
        if let Some(index) = self.items.iter().position(|item| item.name == template.name) {
            let item = &mut self.items[index];
            item.level = item.level.saturating_add(1);
            item.bonus = item.bonus.leveled();
            return AcquireOutcome::Leveled {
                index,
                level: item.level,
            };
        }
        self.items.push(InventoryItem::from_template(template));
        AcquireOutcome::New {
            index: self.items.len() - 1,
        }
    }

    fn get(&self, index: usize) -> Option<&InventoryItem> {
        self.items.get(index)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn iter(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.iter()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Equipment {
    slots: [Option<usize>; 4],
}

impl Equipment {
    /// Puts the inventory entry into its own slot, replacing whatever was there.
    fn equip(&mut self, inventory: &Inventory, index: usize) -> Result<ItemSlot, EquipError> {
        let item = inventory
            .get(index)
            .ok_or(EquipError::UnknownInventoryIndex {
                index,
                inventory_len: inventory.len(),
            })?;
        self.slots[item.slot.index()] = Some(index);
        Ok(item.slot)
    }

    fn equipped(&self, slot: ItemSlot) -> Option<usize> {
        self.slots[slot.index()]
    }

    fn is_equipped(&self, index: usize) -> bool {
        self.slots.contains(&Some(index))
    }

    fn total_bonus(&self, inventory: &Inventory) -> StatBonus {
        self.slots
            .iter()
            .flatten()
            .filter_map(|index| inventory.get(*index))
            .fold(StatBonus::default(), |total, item| total.plus(item.bonus))
    }
}
