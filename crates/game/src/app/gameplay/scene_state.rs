/// Single owner of every mutable piece of the simulation. Systems borrow it for
/// the duration of one tick; collaborators only ever see derived snapshots.
struct GameState {
    tuning: GameTuning,
    rng: ChaCha8Rng,
    player: Player,
    enemies: EnemyRoster,
    boss_id: Option<EntityId>,
    safe_zones: Vec<SafeZone>,
    inventory: Inventory,
    equipment: Equipment,
    resting: bool,
    game_over: bool,
    respawn_timer: f32,
    relocation_timer: f32,
    events: GameplayEventBus,
}

impl GameState {
    fn new(tuning: GameTuning, rng: ChaCha8Rng) -> Self {
        let player = Player::spawn(&tuning);
        let mut state = Self {
            tuning,
            rng,
            player,
            enemies: EnemyRoster::default(),
            boss_id: None,
            safe_zones: Vec::new(),
            inventory: Inventory::default(),
            equipment: Equipment::default(),
            resting: false,
            game_over: false,
            respawn_timer: 0.0,
            relocation_timer: 0.0,
            events: GameplayEventBus::default(),
        };
        for zone_id in 0..state.tuning.safe_zone_count {
            let center = state.random_ground_position();
            state.safe_zones.push(SafeZone {
                id: zone_id as u32,
                center,
                radius: state.tuning.safe_zone_radius,
            });
        }
        state.replenish_teddies();
        let [boss_x, boss_z] = state.tuning.boss_spawn;
        let boss_health = state.tuning.boss.max_health;
        state.boss_id = Some(state.enemies.spawn(
            EnemyKind::Boss,
            ground_point(boss_x, boss_z),
            boss_health,
        ));
        state
    }

    fn random_ground_position(&mut self) -> Vec3 {
        random_ground_position(&mut self.rng, self.tuning.spawn_half_extent())
    }

    fn roll(&mut self, chance: f64) -> bool {
        self.rng.gen::<f64>() < chance
    }

    // Progression

    /// Returns the number of levels gained by this award.
    fn gain_xp(&mut self, amount: u32) -> u32 {
        self.player.xp = self.player.xp.saturating_add(amount);
        let mut levels_gained = 0;
        while self.player.xp >= self.player.xp_to_next {
            self.player.xp -= self.player.xp_to_next;
            self.player.level = self.player.level.saturating_add(1);
            let progression = &self.tuning.progression;
            self.player.max_health =
                scale_rounded(self.player.max_health, progression.max_health_growth);
            self.player.base_attack =
                scale_rounded(self.player.base_attack, progression.attack_growth);
            self.player.xp_to_next =
                scale_rounded(self.player.xp_to_next, progression.xp_threshold_growth).max(1);
            self.player.health = self.effective_max_health() as f32;
            levels_gained += 1;
            self.events.emit(GameplayEvent::LevelUp {
                level: self.player.level,
            });
            info!(
                level = self.player.level,
                max_health = self.player.max_health,
                base_attack = self.player.base_attack,
                xp_to_next = self.player.xp_to_next,
                "player_leveled_up"
            );
        }
        levels_gained
    }

    // Loot and equipment

    fn roll_loot(&mut self) -> &'static ItemTemplate {
        &ITEM_CATALOG[self.rng.gen_range(0..ITEM_CATALOG.len())]
    }

    fn acquire(&mut self, template: &ItemTemplate) -> AcquireOutcome {
        let outcome = self.inventory.acquire(template);
        match outcome {
            AcquireOutcome::New { index } => {
                self.events.emit(GameplayEvent::LootFound {
                    inventory_index: index,
                });
                info!(item = template.name, slot = template.slot.as_token(), "loot_found");
            }
            AcquireOutcome::Leveled { index, level } => {
                self.events.emit(GameplayEvent::LootLeveled {
                    inventory_index: index,
                    level,
                });
                info!(item = template.name, level, "loot_leveled");
            }
        }
        outcome
    }

    fn try_drop_loot(&mut self, kind: EnemyKind) -> Option<AcquireOutcome> {
        let chance = self.tuning.enemy(kind).drop_chance;
        if !self.roll(chance) {
            return None;
        }
        let template = self.roll_loot();
        Some(self.acquire(template))
    }

    fn equip(&mut self, inventory_index: usize) -> Result<ItemSlot, EquipError> {
        let slot = self.equipment.equip(&self.inventory, inventory_index)?;
        self.clamp_player_health();
        self.events.emit(GameplayEvent::ItemEquipped {
            slot,
            inventory_index,
        });
        info!(slot = slot.as_token(), inventory_index, "item_equipped");
        Ok(slot)
    }

    fn equipment_bonus(&self) -> StatBonus {
        if !self.tuning.equipment_stat_bonuses {
            return StatBonus::default();
        }
        self.equipment.total_bonus(&self.inventory)
    }

    fn effective_attack(&self) -> u32 {
        self.player
            .base_attack
            .saturating_add(self.equipment_bonus().attack)
    }

    fn effective_max_health(&self) -> u32 {
        self.player
            .max_health
            .saturating_add(self.equipment_bonus().health)
    }

    fn defense(&self) -> u32 {
        self.equipment_bonus().defense
    }

    fn clamp_player_health(&mut self) {
        let ceiling = self.effective_max_health() as f32;
        self.player.health = self.player.health.clamp(0.0, ceiling);
    }

    // Combat

    /// Swings at every living enemy strictly inside its kind's reach. Returns
    /// how many enemies were hit.
    fn attack(&mut self) -> usize {
        if self.game_over {
            return 0;
        }
        self.player.swing_remaining = SWING_DURATION_SECONDS;
        let attack = self.effective_attack();
        let mut hits = 0;
        for enemy_id in self.enemies.ids() {
            let Some(enemy) = self.enemies.get(enemy_id) else {
                continue;
            };
            if !enemy.alive {
                continue;
            }
            let enemy_tuning = self.tuning.enemy(enemy.kind);
            if enemy.position.distance(self.player.position) >= enemy_tuning.reach {
                continue;
            }
            let damage = attack.saturating_add(enemy_tuning.bonus_damage_taken);
            if self.damage_enemy(enemy_id, damage as f32) {
                hits += 1;
            }
        }
        hits
    }

    /// Applies damage to a living enemy. Unknown or already dead enemies are
    /// left untouched and `false` is returned.
    fn damage_enemy(&mut self, enemy_id: EntityId, amount: f32) -> bool {
        let Some(enemy) = self.enemies.get_mut(enemy_id) else {
            return false;
        };
        if !enemy.alive {
            return false;
        }
        enemy.health = (enemy.health - amount).max(0.0);
        let kind = enemy.kind;
        let killed = enemy.health <= 0.0;
        if killed {
            enemy.alive = false;
        }
        self.events.emit(GameplayEvent::EnemyDamaged { enemy_id, amount });
        if killed {
            self.events.emit(GameplayEvent::EnemyKilled { enemy_id, kind });
            info!(enemy_id = enemy_id.0, kind = kind.as_token(), "enemy_killed");
            let xp_reward = self.tuning.enemy(kind).xp_reward;
            self.gain_xp(xp_reward);
            self.try_drop_loot(kind);
        }
        true
    }

    /// Returns `false` once the run is over; health never leaves `[0, max]`.
    fn damage_player(&mut self, amount: f32) -> bool {
        if self.game_over {
            return false;
        }
        self.player.health = (self.player.health - amount).max(0.0);
        self.events.emit(GameplayEvent::PlayerDamaged { amount });
        debug!(amount, health = self.player.health, "player_damaged");
        if self.player.health <= 0.0 {
            self.player.health = 0.0;
            self.game_over = true;
            self.events.emit(GameplayEvent::GameOver);
            info!(
                level = self.player.level,
                items = self.inventory.len(),
                "game_over"
            );
        }
        true
    }

    fn mitigated_hit(&self, raw_damage: u32) -> f32 {
        raw_damage.saturating_sub(self.defense()).max(1) as f32
    }

    // Player

    fn apply_look(&mut self, input: &InputSnapshot, fixed_dt_seconds: f32) {
        let (look_dx, look_dy) = input.look_delta();
        self.player.yaw -= look_dx * LOOK_RADIANS_PER_UNIT;
        self.player.yaw += input.turn_axis() * TURN_RADIANS_PER_SECOND * fixed_dt_seconds;
        self.player.yaw = wrap_angle(self.player.yaw);
        self.player.pitch = (self.player.pitch - look_dy * LOOK_RADIANS_PER_UNIT)
            .clamp(-std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2);
    }

    fn try_jump(&mut self) -> bool {
        if self.game_over || !self.player.grounded {
            return false;
        }
        self.player.vertical_velocity = self.tuning.player.jump_impulse;
        self.player.grounded = false;
        true
    }

    fn step_player_movement(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) {
        let yaw = self.player.yaw;
        let forward = Vec3::new(yaw.sin(), 0.0, yaw.cos());
        let left = Vec3::new(yaw.cos(), 0.0, -yaw.sin());
        let direction = (forward * input.forward_axis() + left * input.strafe_axis()).normalized();
        let step = direction * (self.tuning.player.move_speed * fixed_dt_seconds);
        let next_x = self.player.position.x + step.x;
        let next_z = self.player.position.z + step.z;
        let ground_y = terrain_height(next_x, next_z);

        self.player.vertical_velocity -= self.tuning.player.gravity * fixed_dt_seconds;
        self.player.position.y += self.player.vertical_velocity * fixed_dt_seconds;
        if self.player.position.y <= ground_y {
            self.player.position.y = ground_y;
            self.player.vertical_velocity = 0.0;
            self.player.grounded = true;
        } else {
            self.player.grounded = false;
        }
        self.player.position.x = next_x;
        self.player.position.z = next_z;
    }

    fn advance_swing(&mut self, fixed_dt_seconds: f32) {
        self.player.swing_remaining = (self.player.swing_remaining - fixed_dt_seconds).max(0.0);
    }

    fn swing_progress(&self) -> Option<f32> {
        (self.player.swing_remaining > 0.0)
            .then(|| 1.0 - self.player.swing_remaining / SWING_DURATION_SECONDS)
    }

    // Enemy AI

    fn run_enemy_ai(&mut self, fixed_dt_seconds: f32) {
        for enemy_id in self.enemies.ids() {
            self.step_enemy(enemy_id, fixed_dt_seconds);
        }
    }

    /// One pursue-then-roll step. Unknown or dead enemies are skipped.
    fn step_enemy(&mut self, enemy_id: EntityId, fixed_dt_seconds: f32) -> bool {
        let player_position = self.player.position;
        let Some(enemy) = self.enemies.get_mut(enemy_id) else {
            return false;
        };
        if !enemy.alive {
            return false;
        }
        enemy.attack_anim_remaining = (enemy.attack_anim_remaining - fixed_dt_seconds).max(0.0);
        let kind = enemy.kind;
        let enemy_tuning = self.tuning.enemy(kind).clone();
        let distance = enemy.position.distance(player_position);
        let in_pursuit_band = distance > enemy_tuning.pursuit_min_distance
            && enemy_tuning
                .pursuit_max_distance
                .map_or(true, |max_distance| distance < max_distance);
        if in_pursuit_band {
            let direction = enemy.position.horizontal_direction_to(player_position);
            enemy.position += direction * (enemy_tuning.move_speed * fixed_dt_seconds);
            enemy.position.y = terrain_height(enemy.position.x, enemy.position.z);
        }

        if distance <= enemy_tuning.attack_range
            && !self.game_over
            && self.roll(enemy_tuning.hit_chance_per_tick)
        {
            let damage = self.mitigated_hit(enemy_tuning.hit_damage);
            if let Some(enemy) = self.enemies.get_mut(enemy_id) {
                enemy.attack_anim_remaining = ENEMY_ATTACK_ANIM_SECONDS;
            }
            debug!(enemy_id = enemy_id.0, kind = kind.as_token(), damage, "enemy_hit_player");
            self.damage_player(damage);
        }
        true
    }

    // Safe zones

    /// Heals at most once per tick no matter how many zones overlap.
    fn apply_safe_zone_healing(&mut self) {
        let position = self.player.position;
        self.resting = self.safe_zones.iter().any(|zone| zone.contains(position));
        if !self.resting || self.game_over {
            return;
        }
        let ceiling = self.effective_max_health() as f32;
        if self.player.health < ceiling {
            self.player.health =
                (self.player.health + self.tuning.safe_zone_heal_per_tick).min(ceiling);
        }
    }

    // Timers

    fn advance_timers(&mut self, fixed_dt_seconds: f32) {
        if self.game_over {
            return;
        }
        self.respawn_timer += fixed_dt_seconds;
        if self.respawn_timer > self.tuning.respawn_interval_seconds {
            self.respawn_timer = 0.0;
            let pruned = self.enemies.prune_dead();
            if self
                .boss_id
                .is_some_and(|boss_id| self.enemies.get(boss_id).is_none())
            {
                self.boss_id = None;
            }
            let spawned = self.replenish_teddies();
            debug!(
                pruned,
                spawned,
                roster = self.enemies.len(),
                "respawn_cycle"
            );
        }

        self.relocation_timer += fixed_dt_seconds;
        if self.relocation_timer > self.tuning.safe_zone_relocation_interval_seconds {
            self.relocation_timer = 0.0;
            self.relocate_safe_zones();
        }
    }

    fn replenish_teddies(&mut self) -> usize {
        let mut spawned = 0;
        let max_health = self.tuning.teddy.max_health;
        while self.enemies.count_of(EnemyKind::Teddy) < self.tuning.teddy_population {
            let position = self.random_ground_position();
            self.enemies.spawn(EnemyKind::Teddy, position, max_health);
            spawned += 1;
        }
        spawned
    }

    fn relocate_safe_zones(&mut self) {
        let half_extent = self.tuning.spawn_half_extent();
        for zone in &mut self.safe_zones {
            zone.center = random_ground_position(&mut self.rng, half_extent);
            debug!(
                zone_id = zone.id,
                x = zone.center.x,
                z = zone.center.z,
                "safe_zone_moved"
            );
        }
        info!(zones = self.safe_zones.len(), "safe_zones_relocated");
    }

    fn hostile_positions(&self) -> Vec<Vec3> {
        self.enemies
            .iter_alive()
            .map(|enemy| enemy.position)
            .collect()
    }
}
