//! Sample positions in plaintext form, used solely by tests. The frames
//! carry premium annotations, which the parser tolerates; lowercase
//! letters are tiles played from a blank.

/// A club game. Column O spells out a long vertical word and (12,12) is
/// a two-way anchor.
pub(crate) const VS_ED: &str = "
 1|=     '       =       '     E|
 2|  -       \"       \"       - N|
 3|    -       '   '       -   d|
 4|'     -       '       -     U|
 5|        G L O W S   -       R|
 6|  \"       \"     P E T     \" E|
 7|    '       ' F A X I N G   R|
 8|=     '     J A Y   T E E M S|
 9|    B     B O Y '       N    |
10|  \" L   D O E     \"     U \"  |
11|    A N E W         - P I    |
12|'   M O   L E U       O N   '|
13|    E H     '   '     H E    |
14|  -       \"       \"       -  |
15|=     '       =       '     =|
";

/// A tournament game; K9 TAEL plays through RESPONDED's missing E.
pub(crate) const VS_MATT: &str = "
 1|=     '       Z E P   F     =|
 2|  F L U K Y       R   R   -  |
 3|    -     E X   ' A   U -    |
 4|'   S C A R I E S T   I     '|
 5|        -         T O T      |
 6|  \"       \" G O   L O     \"  |
 7|    '       O R ' E T A '    |
 8|=     '     J A B S   b     =|
 9|    '     Q I   '     A '    |
10|  \"       I   N   \"   N   \"  |
11|      R e S P O N D - D      |
12|' H O E       V       O     '|
13|  E N C O M I A '     N -    |
14|  -       \"   T   \"       -  |
15|=     V E N G E D     '     =|
";

/// A constructed position with a gigantic play available down column A.
pub(crate) const VS_OXY: &str = "
 1|= P A C I F Y I N G   '     =|
 2|  I S     \"       \"       -  |
 3|Y E -       '   '       -    |
 4|' R E Q U A L I F I E D     '|
 5|H   L   -           -        |
 6|E D S     \"       \"       \"  |
 7|N O '     T '   '       '    |
 8|= R A I N W A S H I N G     =|
 9|U M '     O '   '       '    |
10|T \"   E   O       \"       \"  |
11|  W A K E n E R S   -        |
12|' O n E T I M E       -     '|
13|O O T     E ' B '       -    |
14|N -       \"   U   \"       -  |
15|= J A C U L A T I N G '     =|
";
