use crate::domain::state::Player;

/// Stat upgrade a player can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeKind {
    HpMax,
    Regen,
    Speed,
    FireRate,
    Damage,
    BulletSpeed,
    BulletLife,
    /// Anything the client sent that we do not recognise.
    Unknown,
}

impl UpgradeKind {
    /// Parses the wire name of an upgrade choice; unrecognised names map to `Unknown`.
    pub fn from_choice(choice: &str) -> Self {
        match choice {
            "hpMax" => UpgradeKind::HpMax,
            "regen" => UpgradeKind::Regen,
            "speed" => UpgradeKind::Speed,
            "fireRate" => UpgradeKind::FireRate,
            "damage" => UpgradeKind::Damage,
            "bulletSpeed" => UpgradeKind::BulletSpeed,
            "bulletLife" => UpgradeKind::BulletLife,
            _ => UpgradeKind::Unknown,
        }
    }
}

pub type UpgradeEffect = fn(Player) -> Player;

const UPGRADES: &[(UpgradeKind, UpgradeEffect)] = &[
    (UpgradeKind::HpMax, hp_max),
    (UpgradeKind::Regen, regen),
    (UpgradeKind::Speed, speed),
    (UpgradeKind::FireRate, fire_rate),
    (UpgradeKind::Damage, damage),
    (UpgradeKind::BulletSpeed, bullet_speed),
    (UpgradeKind::BulletLife, bullet_life),
    (UpgradeKind::Unknown, no_op),
];

/// Looks up the effect for `kind`. Every kind has an entry.
pub fn effect(kind: UpgradeKind) -> UpgradeEffect {
    UPGRADES
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, f)| *f)
        .unwrap_or(no_op)
}

pub fn apply_upgrade(player: Player, kind: UpgradeKind) -> Player {
    effect(kind)(player)
}

fn hp_max(p: Player) -> Player {
    let max_hp = p.max_hp + 20.0;
    Player {
        max_hp,
        hp: max_hp,
        ..p
    }
}

fn regen(p: Player) -> Player {
    Player {
        regen: p.regen + 0.5,
        ..p
    }
}

fn speed(p: Player) -> Player {
    Player {
        speed: p.speed + 20.0,
        ..p
    }
}

fn fire_rate(p: Player) -> Player {
    Player {
        fire_cooldown: p.fire_cooldown * 0.9,
        ..p
    }
}

// Bonus survives tier recomputation; the live stat moves with it.
fn damage(p: Player) -> Player {
    Player {
        damage_bonus: p.damage_bonus + 5.0,
        damage: p.damage + 5.0,
        ..p
    }
}

fn bullet_speed(p: Player) -> Player {
    Player {
        bullet_speed: p.bullet_speed + 100.0,
        ..p
    }
}

fn bullet_life(p: Player) -> Player {
    Player {
        bullet_life: p.bullet_life + 0.2,
        ..p
    }
}

fn no_op(p: Player) -> Player {
    p
}
