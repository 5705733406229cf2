use super::{BuffDef, Category, Mechanic};

const FPS: f32 = 60.0;

/// Charged shots last until used
const UNTIL_USED: f32 = 999.0;

fn def(
    key: &str,
    name: &str,
    description: &str,
    color: &str,
    symbol: &str,
    seconds: f32,
    category: Category,
    mechanic: Mechanic,
) -> BuffDef {
    BuffDef {
        key: key.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        color: color.to_string(),
        symbol: symbol.to_string(),
        duration: seconds * FPS,
        category,
        permanent: false,
        unique: false,
        effect_template: None,
        mechanic: Some(mechanic),
    }
}

impl BuffDef {
    fn permanent(mut self) -> Self {
        self.permanent = true;
        self
    }

    fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

#[rustfmt::skip]
pub(super) fn builtin_defs() -> Vec<BuffDef> {
    use Category::*;
    use Mechanic::*;
    vec![
        // Attack
        def("SPEED_ADVANTAGE", "Vantagem de Velocidade", "Your whole team runs a little faster.", "#facc15", "⚡️", 10.0, Attack, SpeedAdvantage),
        def("FIREBALL_SHOT", "Chute de Fogo", "Charges a player with a powerful shot. Lasts until used.", "#f87171", "🔥", UNTIL_USED, Attack, Fireball),
        def("MAGNETIC_BALL", "Bola Magnética", "The ball is drawn toward your players.", "#f472b6", "🧲", 8.0, Attack, MagneticBall),
        def("HOMING_SHOT", "Chute Teleguiado", "The next shot bends toward the opponent's goal.", "#06b6d4", "🎯", UNTIL_USED, Attack, Homing),
        def("BULLDOZER_SHOT", "Chute Trator", "The next shot shoves opponents out of its path.", "#a16207", "🚜", UNTIL_USED, Attack, Bulldozer),
        def("TELEPORT_DRIBBLE", "Drible com Teleporte", "The next touch teleports the player forward.", "#9333ea", "🌌", UNTIL_USED, Attack, TeleportDribble),
        def("GOAL_SHRINK", "Encolher Gol", "The opponent's goal gets narrower.", "#78716c", "🥅🤏", 12.0, Attack, GoalShrink),
        def("CHUTE_TIGRE", "Chute do Tigre", "A brutal shot that bowls over anyone in the way.", "#f97316", "🐅", UNTIL_USED, Attack, Tiger),
        def("FURACAO_DE_FOGO", "Furacão de Fogo", "A blazing spinning shot.", "#dc2626", "🌪️🔥", UNTIL_USED, Attack, FireHurricane),
        def("TIRO_DE_EFEITO", "Tiro de Efeito", "The next shot curls toward the centre of the goal.", "#16a34a", "💫", UNTIL_USED, Attack, CurveShot),
        def("BOLA_DE_CANHAO", "Bola de Canhão", "The next shot turns the ball into a heavy cannonball.", "#44403c", "💣", UNTIL_USED, Attack, Cannonball),
        def("CHUTE_COMETA", "Chute Cometa", "The fastest shot in the game.", "#93c5fd", "☄️", UNTIL_USED, Attack, Comet),
        def("BOMBA_DE_IMPACTO", "Bomba de Impacto", "The ball explodes when an opponent touches it.", "#fca5a5", "💥", UNTIL_USED, Attack, ImpactBomb),
        def("CHUTE_FANTASMA", "Chute Fantasma", "The ball vanishes for part of its flight.", "#d1d5db", "👻", UNTIL_USED, Attack, PhantomShot),
        def("BROCA_GIRATORIA", "Broca Giratória", "The shot may drill straight through the goalkeeper.", "#fcd34d", "⚙️", UNTIL_USED, Attack, Drill),
        def("CHUTE_DE_DOIS_ESTAGIOS", "Chute de Dois Estágios", "The shot fires a second stage halfway through its flight.", "#a78bfa", "🚀", UNTIL_USED, Attack, TwoStage),
        def("BOLA_DE_CHUMBO", "Bola de Chumbo", "The ball becomes as heavy as lead.", "#4b5563", "⚓", UNTIL_USED, Attack, LeadBall),
        // Defense
        def("GOAL_SHIELD", "Escudo de Gol", "A shield covers your goal.", "#60a5fa", "🛡️", 10.0, Defense, GoalShield),
        def("SLOW_GAME", "Jogo Lento", "The opposing team slows down.", "#c084fc", "🐢", 7.0, Defense, SlowGame),
        def("CONFUSE_RAY", "Raio Confusor", "An opposing player stumbles around confused.", "#eab308", "🌀", 7.0, Defense, Confuse),
        def("SHRINK_OPPONENT", "Encolher Adversário", "The opposing team shrinks.", "#f97316", "🤏", 10.0, Defense, ShrinkOpponent),
        def("TEAM_GIANTS", "Gigantes em Campo", "Your whole team grows.", "#22d3ee", "💪", 10.0, Defense, TeamGiants),
        def("TEMP_RED_CARD", "Cartão Vermelho", "An opposing player is frozen in place.", "#ef4444", "🟥", 5.0, Defense, Freeze),
        def("GIANT_GOALIE", "Goleiro Gigante", "Your goalkeeper doubles in size.", "#f59e0b", "🧤", 10.0, Defense, GiantGoalie),
        def("GOALIE_INSTINCT", "Instinto de Goleiro", "Your last defender reads shots at goal.", "#8b5cf6", "🥅", 15.0, Defense, GoalieInstinct),
        def("REPULSOR_FIELD", "Campo Repulsor", "Opponents are pushed away from the player.", "#a78bfa", "💨", 8.0, Defense, RepulsorField),
        def("MAO_FANTASMA", "Mão Fantasma", "A ghostly hand stops one goal against you.", "#a855f7", "✋👻", 30.0, Defense, GhostHand).unique(),
        def("ZONA_MORTA", "Zona Morta", "Plants a trap that paralyzes the first opponent to touch it.", "#7f1d1d", "🕸️", 20.0, Defense, DeadZone),
        def("EMPURRAR_LINHA", "Empurrar Linha", "Pushes the opposing outfield line back.", "#047857", "📊", 1.0, Defense, PushLine),
        def("GEL_ESCORREGADIO", "Gel Escorregadio", "Slippery gel in the opponent's box unsettles their goalkeeper.", "#a5f3fc", "🧊", 15.0, Defense, SlipperyGel),
        def("CEGUEIRA_TEMPORARIA", "Cegueira Temporária", "The opposing goalkeeper reacts late.", "#3f3f46", "🕶️", 8.0, Defense, BlindGoalie),
        def("GOLEIRO_ENCOLHIDO", "Goleiro Encolhido", "The opposing goalkeeper shrinks.", "#7c2d12", "🐜", 12.0, Defense, ShrinkGoalie),
        def("INVERSAO_DE_CONTROLES_GOLEIRO", "Controles Invertidos", "The opposing goalkeeper moves the wrong way.", "#e11d48", "↔️", 10.0, Defense, InvertGoalie),
        def("IMAN_REVERSO", "Imã Reverso", "The opposing goalkeeper repels the ball.", "#ec4899", "🔄", 15.0, Defense, ReverseMagnet),
        // Utility
        def("SWAP_PLAYER", "Troca Tática", "Swaps places with a random opponent.", "#db2777", "⇄", 1.0, Utility, SwapPlayer),
        def("DRIBLE_FANTASMA", "Drible Fantasma", "The player runs through opponents.", "#e5e7eb", "👥", 6.0, Utility, GhostDribble),
        def("JOGADOR_CASCUDO", "Jogador Cascudo", "A tougher, quicker player for the rest of the match.", "#fde047", "⭐", 9999.0, Utility, Veteran).permanent(),
        def("PURA_ENERGIA", "Pura Energia", "Cleanses your team of hostile effects and gives it a burst of speed.", "#10b981", "🔋", 1.0, Utility, PureEnergy),
        def("TERREMOTO_NA_AREA", "Terremoto na Área", "The ground shakes whenever the ball is in the opponent's box.", "#ca8a04", "🌋", 20.0, Utility, AreaEarthquake),
    ]
}
