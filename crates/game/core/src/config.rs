/// Combat and economy tuning parameters.
///
/// Defaults reproduce the live bot's balance. Percentages are integers
/// (`25` = 25 %) so every formula stays in integer arithmetic.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Coins awarded to the attacker on a kill.
    pub kill_bonus: u64,
    /// Coins removed from the victim on KO (floored at 0).
    pub death_penalty: u64,
    /// Coins per point of nominal damage dealt to another entity.
    pub coins_per_damage: u64,
    /// Coins per point of actual healing given to another entity.
    pub coins_per_heal: u64,

    /// Self-damage taken by an attacker carrying VIRUS.
    pub virus_transfer_damage: u32,
    /// Flat damage added when an infected attacker hits an uninfected target.
    pub infection_attack_bonus: u32,
    /// Chance (percent) that such a hit also infects the target.
    pub infection_spread_chance_pct: u32,
    /// Immediate damage dealt on a successful infection spread.
    pub infection_burst_damage: u32,

    /// HP restored on revive, as a percentage of max HP.
    pub revive_hp_pct: u32,

    /// Starting max HP for auto-created entities.
    pub default_max_hp: u32,
    /// Starting max shield for auto-created entities.
    pub default_max_shield: u32,

    /// Minimum seconds between two attacks by the same entity (0 disables).
    pub offense_cooldown_secs: u64,
}

impl CombatConfig {
    pub const DEFAULT_KILL_BONUS: u64 = 50;
    pub const DEFAULT_DEATH_PENALTY: u64 = 25;
    pub const DEFAULT_MAX_HP: u32 = 100;
    pub const DEFAULT_MAX_SHIELD: u32 = 20;

    pub fn new() -> Self {
        Self {
            kill_bonus: Self::DEFAULT_KILL_BONUS,
            death_penalty: Self::DEFAULT_DEATH_PENALTY,
            coins_per_damage: 1,
            coins_per_heal: 1,
            virus_transfer_damage: 5,
            infection_attack_bonus: 3,
            infection_spread_chance_pct: 25,
            infection_burst_damage: 5,
            revive_hp_pct: 30,
            default_max_hp: Self::DEFAULT_MAX_HP,
            default_max_shield: Self::DEFAULT_MAX_SHIELD,
            offense_cooldown_secs: 0,
        }
    }

    pub fn with_offense_cooldown(mut self, secs: u64) -> Self {
        self.offense_cooldown_secs = secs;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
