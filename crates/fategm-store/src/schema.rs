//! Round subsystem database schema.
//!
//! The `campaigns` table is owned by the surrounding application; it is
//! created here only so a fresh database is usable, and this crate never
//! writes to it.

/// SQL to create the round subsystem tables.
pub const CREATE_ROUND_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS campaigns (
    id          UUID PRIMARY KEY,
    name        VARCHAR(255) NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS rounds (
    id          UUID PRIMARY KEY,
    campaign_id UUID NOT NULL REFERENCES campaigns (id),
    turn_number INTEGER NOT NULL,
    status      VARCHAR(16) NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL,
    closed_at   TIMESTAMPTZ,
    UNIQUE (campaign_id, turn_number)
);

CREATE UNIQUE INDEX IF NOT EXISTS uq_rounds_one_open_per_campaign
    ON rounds (campaign_id)
    WHERE status = 'OPEN';

CREATE TABLE IF NOT EXISTS action_submissions (
    id            UUID PRIMARY KEY,
    round_id      UUID NOT NULL REFERENCES rounds (id),
    campaign_id   UUID NOT NULL REFERENCES campaigns (id),
    servant_class VARCHAR(255) NOT NULL,
    action_kind   VARCHAR(32) NOT NULL,
    content       TEXT NOT NULL,
    submitted_by  VARCHAR(255),
    is_current    BOOLEAN NOT NULL DEFAULT FALSE,
    turn_number   INTEGER NOT NULL,
    created_at    TIMESTAMPTZ NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS uq_action_submissions_current_slot
    ON action_submissions (round_id, servant_class, action_kind)
    WHERE is_current;

CREATE INDEX IF NOT EXISTS idx_action_submissions_campaign_current
    ON action_submissions (campaign_id)
    WHERE is_current;

CREATE TABLE IF NOT EXISTS action_history (
    id              UUID PRIMARY KEY,
    campaign_id     UUID NOT NULL REFERENCES campaigns (id),
    turn_number     INTEGER NOT NULL,
    closed_at       TIMESTAMPTZ NOT NULL,
    action_order    JSONB,
    servant_actions JSONB,
    master_actions  JSONB,
    created_at      TIMESTAMPTZ NOT NULL,
    UNIQUE (campaign_id, turn_number)
);

CREATE INDEX IF NOT EXISTS idx_action_history_campaign_turn
    ON action_history (campaign_id, turn_number DESC);
";
